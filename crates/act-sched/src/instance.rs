use std::fmt;

use act_core::{EasingFn, Futurable, Point, SoundServer, SourceId};

use crate::action::{CustomFn, RepeatCount, Rotation};

/// Handle to a node inside an [`ActionInstance`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub(crate) u32);

impl ActionId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Captured move state: starting point and signed per-axis delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MoveTween {
    pub from: Point,
    pub delta: Point,
}

/// Captured rotation state: signed delta and the exact final angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Spin {
    pub delta: f64,
    pub final_angle: f64,
}

/// Per-kind runtime payload of a prepared node.
pub(crate) enum NodeKind {
    Wait,
    Custom {
        callback: CustomFn,
        fired: bool,
    },
    Move {
        to: Point,
        easing: EasingFn,
        tween: Option<MoveTween>,
    },
    Scale {
        to: f64,
        delta: Option<f64>,
    },
    FadeAlpha {
        to: f64,
        delta: Option<f64>,
    },
    Rotate {
        rotation: Rotation,
        shortest_arc: bool,
        spin: Option<Spin>,
    },
    Play {
        sound: String,
        source: Option<SourceId>,
    },
    Sequence,
    Group,
    Repeat {
        count: RepeatCount,
        completed_repetitions: u64,
        cumulative_duration: f64,
    },
}

impl NodeKind {
    pub(crate) fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Sequence | NodeKind::Group | NodeKind::Repeat { .. }
        )
    }
}

/// One prepared action node.
pub(crate) struct ActionNode {
    pub kind: NodeKind,
    pub parent: Option<ActionId>,
    pub children: Vec<ActionId>,
    pub start_offset: Futurable,
    pub duration: Futurable,
    /// Frame-clock time at which this run began; `None` until the first
    /// evaluation binds it for the whole subtree.
    pub run_start: Option<f64>,
    pub started: bool,
    pub running: bool,
    /// Stored completion flag; only meaningful for leaves. Container
    /// completion is derived on demand, never cached.
    pub completed: bool,
    pub run_during_transition: bool,
}

/// A prepared, run-ready action tree: an arena of nodes addressed by
/// [`ActionId`], with child handles for ownership order and parent handles
/// as non-owning back-references.
///
/// Produced by preparation from an [`Action`](crate::Action) template;
/// evaluated once per frame until the root is completed. Instances are
/// fully independent of the template and of each other.
pub struct ActionInstance {
    pub(crate) nodes: Vec<ActionNode>,
    pub(crate) root: ActionId,
    key: Option<String>,
    /// Set once the run has been reported to the trace sink.
    pub(crate) run_traced: bool,
    /// Set once the root's completion has been reported to the trace sink.
    pub(crate) completion_traced: bool,
}

impl ActionInstance {
    pub(crate) fn new(nodes: Vec<ActionNode>, root: ActionId, key: Option<String>) -> Self {
        Self {
            nodes,
            root,
            key,
            run_traced: false,
            completion_traced: false,
        }
    }

    /// The caller-supplied tag this instance was run under.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn root(&self) -> ActionId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of `id`, in ownership order.
    pub fn children(&self, id: ActionId) -> &[ActionId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: ActionId) -> Option<ActionId> {
        self.nodes[id.index()].parent
    }

    /// Current duration of `id`; `INFINITY` while unresolved.
    pub fn duration_of(&self, id: ActionId) -> f64 {
        self.nodes[id.index()].duration.value()
    }

    /// Current start offset of `id` relative to the run start.
    pub fn start_offset_of(&self, id: ActionId) -> f64 {
        self.nodes[id.index()].start_offset.value()
    }

    pub fn is_running(&self, id: ActionId) -> bool {
        self.nodes[id.index()].running
    }

    pub fn is_started(&self, id: ActionId) -> bool {
        self.nodes[id.index()].started
    }

    /// Whether the whole instance has finished.
    pub fn is_completed(&self) -> bool {
        self.node_completed(self.root)
    }

    /// Completed repetitions of a repeat container; 0 for other kinds.
    pub fn completed_repetitions(&self, id: ActionId) -> u64 {
        match &self.nodes[id.index()].kind {
            NodeKind::Repeat {
                completed_repetitions,
                ..
            } => *completed_repetitions,
            _ => 0,
        }
    }

    /// Derived completion: leaves read their stored flag, containers
    /// compute from children (and repetition count for repeat containers).
    pub(crate) fn node_completed(&self, id: ActionId) -> bool {
        let node = &self.nodes[id.index()];
        match &node.kind {
            NodeKind::Sequence | NodeKind::Group => node
                .children
                .iter()
                .all(|&child| self.node_completed(child)),
            NodeKind::Repeat {
                count,
                completed_repetitions,
                ..
            } => match count {
                RepeatCount::Times(n) => *completed_repetitions >= u64::from(*n),
                RepeatCount::Forever => false,
            },
            _ => node.completed,
        }
    }

    /// Pre-order walk of `id` and everything below it.
    pub(crate) fn subtree(&self, id: ActionId) -> Vec<ActionId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            // Reverse so the pre-order pops children left to right.
            for &child in self.nodes[next.index()].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Stop and disconnect every live `Play` source in the tree. Called on
    /// explicit removal so cancellation never leaks a sounding source.
    pub(crate) fn cancel(&mut self, sounds: &mut dyn SoundServer) {
        for node in &mut self.nodes {
            if let NodeKind::Play { source, .. } = &mut node.kind {
                if let Some(id) = source.take() {
                    sounds.stop(id);
                }
            }
        }
    }
}

impl fmt::Debug for ActionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInstance")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("key", &self.key)
            .field("completed", &self.is_completed())
            .finish()
    }
}

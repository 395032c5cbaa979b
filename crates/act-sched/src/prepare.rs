use act_core::{ActionError, Futurable};

use crate::action::{Action, ActionKind};
use crate::instance::{ActionId, ActionInstance, ActionNode, NodeKind};

/// Instantiate `template` into an independent, run-ready arena.
///
/// Pre-order flattening assigns parents top-down; durations fold bottom-up
/// as each subtree closes; transition safety then propagates upward and
/// start offsets are placed top-down.
pub(crate) fn prepare(
    template: &Action,
    key: Option<&str>,
) -> Result<ActionInstance, ActionError> {
    let mut nodes: Vec<ActionNode> = Vec::new();
    let root = flatten(template, None, &mut nodes)?;

    // Reverse pre-order visits every child before its parent.
    for i in (0..nodes.len()).rev() {
        if nodes[i].run_during_transition {
            if let Some(parent) = nodes[i].parent {
                nodes[parent.index()].run_during_transition = true;
            }
        }
    }

    place_offsets(&mut nodes, root);

    Ok(ActionInstance::new(nodes, root, key.map(str::to_owned)))
}

fn flatten(
    template: &Action,
    parent: Option<ActionId>,
    nodes: &mut Vec<ActionNode>,
) -> Result<ActionId, ActionError> {
    if matches!(template.kind, ActionKind::Repeat { .. }) && template.children.len() != 1 {
        return Err(ActionError::MalformedRepeat {
            got: template.children.len(),
        });
    }

    let id = ActionId(nodes.len() as u32);
    nodes.push(ActionNode {
        kind: instantiate(&template.kind),
        parent,
        children: Vec::new(),
        start_offset: Futurable::known(0.0),
        duration: Futurable::unknown(),
        run_start: None,
        started: false,
        running: false,
        completed: false,
        run_during_transition: template.run_during_transition,
    });

    for child in &template.children {
        let child_id = flatten(child, Some(id), nodes)?;
        nodes[id.index()].children.push(child_id);
    }

    let children = nodes[id.index()].children.clone();
    let duration = duration_of(&template.kind, &children, nodes);
    nodes[id.index()].duration = duration;
    Ok(id)
}

fn instantiate(kind: &ActionKind) -> NodeKind {
    match kind {
        ActionKind::Wait { .. } => NodeKind::Wait,
        ActionKind::Custom { callback } => NodeKind::Custom {
            callback: callback.clone(),
            fired: false,
        },
        ActionKind::Move { to, easing, .. } => NodeKind::Move {
            to: *to,
            easing: *easing,
            tween: None,
        },
        ActionKind::Scale { to, .. } => NodeKind::Scale {
            to: *to,
            delta: None,
        },
        ActionKind::FadeAlpha { to, .. } => NodeKind::FadeAlpha {
            to: *to,
            delta: None,
        },
        ActionKind::Rotate {
            rotation,
            shortest_arc,
            ..
        } => NodeKind::Rotate {
            rotation: *rotation,
            shortest_arc: *shortest_arc,
            spin: None,
        },
        ActionKind::Play { sound } => NodeKind::Play {
            sound: sound.clone(),
            source: None,
        },
        ActionKind::Sequence => NodeKind::Sequence,
        ActionKind::Group => NodeKind::Group,
        ActionKind::Repeat { count } => NodeKind::Repeat {
            count: *count,
            completed_repetitions: 0,
            cumulative_duration: 0.0,
        },
    }
}

/// Duration rules: leaves know theirs up front (`Play` excepted), a
/// sequence sums its children, a group takes the lazy maximum, and repeat
/// containers stay unknown until their count is satisfied at run time.
fn duration_of(kind: &ActionKind, children: &[ActionId], nodes: &[ActionNode]) -> Futurable {
    match kind {
        ActionKind::Wait { duration }
        | ActionKind::Move { duration, .. }
        | ActionKind::Scale { duration, .. }
        | ActionKind::FadeAlpha { duration, .. }
        | ActionKind::Rotate { duration, .. } => Futurable::known(*duration),
        ActionKind::Custom { .. } => Futurable::known(0.0),
        ActionKind::Play { .. } => Futurable::unknown(),
        ActionKind::Sequence => {
            let total = Futurable::known(0.0);
            for &child in children {
                total.add(&nodes[child.index()].duration);
            }
            total
        }
        ActionKind::Group => {
            Futurable::max_of(children.iter().map(|&c| nodes[c.index()].duration.clone()))
        }
        ActionKind::Repeat { .. } => Futurable::unknown(),
    }
}

/// Start-offset rules, applied top-down: under a sequence each child starts
/// after the durations of its preceding siblings; under a group or repeat
/// container every child starts with its parent.
fn place_offsets(nodes: &mut [ActionNode], root: ActionId) {
    nodes[root.index()].start_offset = Futurable::known(0.0);

    // Pre-order storage: parents precede children, so a single forward
    // pass sees every parent's offset before placing its children.
    for i in 0..nodes.len() {
        let children = nodes[i].children.clone();
        if children.is_empty() {
            continue;
        }
        let parent_offset = nodes[i].start_offset.clone();
        if matches!(nodes[i].kind, NodeKind::Sequence) {
            let mut previous: Option<ActionId> = None;
            for &child in &children {
                let offset = match previous {
                    None => Futurable::known(0.0).add(&parent_offset),
                    Some(prev) => Futurable::known(0.0)
                        .add(&nodes[prev.index()].start_offset)
                        .add(&nodes[prev.index()].duration),
                };
                nodes[child.index()].start_offset = offset;
                previous = Some(child);
            }
        } else if matches!(nodes[i].kind, NodeKind::Group | NodeKind::Repeat { .. }) {
            for &child in &children {
                nodes[child.index()].start_offset = Futurable::known(0.0).add(&parent_offset);
            }
        }
    }
}

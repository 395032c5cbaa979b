use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The scheduler events worth recording, one variant per observable
/// lifecycle point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceTag {
    /// An action was placed on a runner's active list.
    ActionRun,
    /// A top-level action's root completed.
    ActionCompleted,
    /// A repeat container finished one repetition.
    RepeatCycle,
    /// A `Play` leaf found its buffer undecoded and will retry.
    PlayPending,
    /// A `Play` leaf started a live audio source.
    PlayStarted,
    /// A `Play` leaf's duration resolved from its completion callback.
    PlayResolved,
}

impl fmt::Display for TraceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraceTag::ActionRun => "action.run",
            TraceTag::ActionCompleted => "action.completed",
            TraceTag::RepeatCycle => "repeat.cycle",
            TraceTag::PlayPending => "play.pending",
            TraceTag::PlayStarted => "play.started",
            TraceTag::PlayResolved => "play.resolved",
        })
    }
}

/// One recorded scheduler event.
///
/// Plain data so a run can be captured live and rendered later by tooling.
/// `node` is the arena index of the node the event concerns (0 for
/// whole-action events, whose subject is the root); `count` carries the
/// tag's counter, where it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    /// Frame clock at emission, whole milliseconds.
    pub now_ms: u64,
    pub tag: TraceTag,
    /// Arena index of the subject node.
    pub node: u32,
    /// Tag-specific counter: node count for [`TraceTag::ActionRun`],
    /// completed repetitions for [`TraceTag::RepeatCycle`], otherwise 0.
    pub count: u64,
}

impl TraceEvent {
    pub fn action_run(now_ms: u64, node_count: u64) -> Self {
        Self {
            now_ms,
            tag: TraceTag::ActionRun,
            node: 0,
            count: node_count,
        }
    }

    pub fn action_completed(now_ms: u64) -> Self {
        Self {
            now_ms,
            tag: TraceTag::ActionCompleted,
            node: 0,
            count: 0,
        }
    }

    pub fn repeat_cycle(now_ms: u64, node: u32, repetitions: u64) -> Self {
        Self {
            now_ms,
            tag: TraceTag::RepeatCycle,
            node,
            count: repetitions,
        }
    }

    pub fn play_pending(now_ms: u64, node: u32) -> Self {
        Self {
            now_ms,
            tag: TraceTag::PlayPending,
            node,
            count: 0,
        }
    }

    pub fn play_started(now_ms: u64, node: u32) -> Self {
        Self {
            now_ms,
            tag: TraceTag::PlayStarted,
            node,
            count: 0,
        }
    }

    pub fn play_resolved(now_ms: u64, node: u32) -> Self {
        Self {
            now_ms,
            tag: TraceTag::PlayResolved,
            node,
            count: 0,
        }
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Sink for hosts that do not record; every event is dropped.
#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// In-memory sink, mainly for tests and debug tooling.
#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    /// The recorded tags, in emission order.
    pub fn tags(&self) -> Vec<TraceTag> {
        self.events.iter().map(|e| e.tag).collect()
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

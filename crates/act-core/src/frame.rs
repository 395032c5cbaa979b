#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-frame clock sample supplied by the host render loop.
///
/// `now` must be monotonically non-decreasing across frames; the scheduler
/// never reads ambient time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameContext {
    /// Frame clock, in milliseconds.
    pub now: f64,
    /// Time since the previous frame, in milliseconds.
    pub dt: f64,
}

impl FrameContext {
    pub fn new(now: f64, dt: f64) -> Self {
        Self { now, dt }
    }
}

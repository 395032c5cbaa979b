#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point in the target node's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The scene-graph node an action mutates.
///
/// The scheduler intentionally does not prescribe anything beyond the
/// animatable fields and the transition query; rendering, layout, and
/// hierarchy live with the host.
pub trait ActionTarget {
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);

    fn scale(&self) -> f64;
    fn set_scale(&mut self, scale: f64);

    fn alpha(&self) -> f64;
    fn set_alpha(&mut self, alpha: f64);

    fn z_rotation(&self) -> f64;
    fn set_z_rotation(&mut self, radians: f64);

    /// Whether the node is currently part of an in-progress scene
    /// transition. Actions not opted in via `run_during_transition` are
    /// gated while this is true.
    fn in_transition(&self) -> bool {
        false
    }
}

use std::fmt;
use std::rc::Rc;

use act_core::{easing, ActionTarget, EasingFn, Point};

/// Rotation goal for the rotate action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    /// Relative turn by the given angle (radians, signed).
    By(f64),
    /// Absolute destination angle (radians); normalized into `[0, 2π)`
    /// before the delta is computed.
    To(f64),
}

/// Repetition count for repeat containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Times(u32),
    Forever,
}

/// Callback payload of a custom action.
pub type CustomFn = Rc<dyn Fn(&mut dyn ActionTarget)>;

#[derive(Clone)]
pub(crate) enum ActionKind {
    Wait { duration: f64 },
    Custom { callback: CustomFn },
    Move { to: Point, duration: f64, easing: EasingFn },
    Scale { to: f64, duration: f64 },
    FadeAlpha { to: f64, duration: f64 },
    Rotate { rotation: Rotation, shortest_arc: bool, duration: f64 },
    Play { sound: String },
    Sequence,
    Group,
    Repeat { count: RepeatCount },
}

impl ActionKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ActionKind::Wait { .. } => "Wait",
            ActionKind::Custom { .. } => "Custom",
            ActionKind::Move { .. } => "Move",
            ActionKind::Scale { .. } => "Scale",
            ActionKind::FadeAlpha { .. } => "FadeAlpha",
            ActionKind::Rotate { .. } => "Rotate",
            ActionKind::Play { .. } => "Play",
            ActionKind::Sequence => "Sequence",
            ActionKind::Group => "Group",
            ActionKind::Repeat {
                count: RepeatCount::Times(_),
            } => "Repeat",
            ActionKind::Repeat {
                count: RepeatCount::Forever,
            } => "RepeatForever",
        }
    }
}

/// An action template: a declarative, time-composable description of change
/// on a target node.
///
/// Templates are plain values built from the static factories below.
/// Running one never mutates it — preparation instantiates an independent
/// runtime tree — so the same template can drive any number of targets
/// concurrently.
#[derive(Clone)]
pub struct Action {
    pub(crate) kind: ActionKind,
    pub(crate) children: Vec<Action>,
    pub(crate) run_during_transition: bool,
}

impl Action {
    fn leaf(kind: ActionKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            run_during_transition: false,
        }
    }

    /// Do nothing for `duration_ms`.
    pub fn wait(duration_ms: f64) -> Self {
        Self::leaf(ActionKind::Wait {
            duration: duration_ms,
        })
    }

    /// Invoke `callback` exactly once, synchronously, then complete.
    pub fn custom(callback: impl Fn(&mut dyn ActionTarget) + 'static) -> Self {
        Self::leaf(ActionKind::Custom {
            callback: Rc::new(callback),
        })
    }

    /// Move the target to `to` over `duration_ms` along `easing`.
    pub fn move_to(to: Point, duration_ms: f64, easing: EasingFn) -> Self {
        Self::leaf(ActionKind::Move {
            to,
            duration: duration_ms,
            easing,
        })
    }

    /// Linear move; shorthand for the common case.
    pub fn move_to_linear(to: Point, duration_ms: f64) -> Self {
        Self::move_to(to, duration_ms, easing::linear)
    }

    /// Scale the target to the absolute factor `to` over `duration_ms`.
    pub fn scale_to(to: f64, duration_ms: f64) -> Self {
        Self::leaf(ActionKind::Scale {
            to,
            duration: duration_ms,
        })
    }

    /// Fade the target's alpha to `to` over `duration_ms`.
    pub fn fade_alpha_to(to: f64, duration_ms: f64) -> Self {
        Self::leaf(ActionKind::FadeAlpha {
            to,
            duration: duration_ms,
        })
    }

    /// Rotate by a signed relative angle (radians).
    pub fn rotate_by(radians: f64, duration_ms: f64) -> Self {
        Self::leaf(ActionKind::Rotate {
            rotation: Rotation::By(radians),
            shortest_arc: false,
            duration: duration_ms,
        })
    }

    /// Rotate to an absolute angle (radians), taking the shorter arc.
    pub fn rotate_to(radians: f64, duration_ms: f64) -> Self {
        Self::leaf(ActionKind::Rotate {
            rotation: Rotation::To(radians),
            shortest_arc: true,
            duration: duration_ms,
        })
    }

    /// Override the shortest-arc behavior of an absolute rotation.
    pub fn shortest_unit_arc(mut self, shortest: bool) -> Self {
        if let ActionKind::Rotate { shortest_arc, .. } = &mut self.kind {
            *shortest_arc = shortest;
        }
        self
    }

    /// Play a named sound to completion. The duration is unknown until the
    /// audio backend reports playback finished.
    pub fn play(sound: impl Into<String>) -> Self {
        Self::leaf(ActionKind::Play {
            sound: sound.into(),
        })
    }

    /// Run `children` one after another; total duration is the sum.
    pub fn sequence(children: Vec<Action>) -> Self {
        Self {
            kind: ActionKind::Sequence,
            children,
            run_during_transition: false,
        }
    }

    /// Run `children` simultaneously; total duration is the maximum.
    pub fn group(children: Vec<Action>) -> Self {
        Self {
            kind: ActionKind::Group,
            children,
            run_during_transition: false,
        }
    }

    /// Run `child` `count` times back to back.
    pub fn repeat(count: u32, child: Action) -> Self {
        Self {
            kind: ActionKind::Repeat {
                count: RepeatCount::Times(count),
            },
            children: vec![child],
            run_during_transition: false,
        }
    }

    /// Run `child` forever; never completes.
    pub fn repeat_forever(child: Action) -> Self {
        Self {
            kind: ActionKind::Repeat {
                count: RepeatCount::Forever,
            },
            children: vec![child],
            run_during_transition: false,
        }
    }

    /// Keep advancing this action while the target is mid scene-transition.
    /// The flag propagates upward at preparation time: a container is
    /// transition-safe if any descendant is.
    pub fn run_during_transition(mut self, run: bool) -> Self {
        self.run_during_transition = run;
        self
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind.name())
            .field("children", &self.children)
            .field("run_during_transition", &self.run_during_transition)
            .finish()
    }
}

//! Frame-driven scheduler primitives: deferred values, easing curves, and
//! the collaborator seams (target node, frame clock, sound server).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod easing;
pub mod error;
pub mod frame;
pub mod futurable;
pub mod sound;
pub mod target;

pub use easing::EasingFn;
pub use error::ActionError;
pub use frame::FrameContext;
pub use futurable::Futurable;
pub use sound::{CompletionFn, NullSoundServer, SoundServer, SoundStatus, SourceId};
pub use target::{ActionTarget, Point};

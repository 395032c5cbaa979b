//! Action scheduling runtime built on `act-core`.
//!
//! A small interpreter for a declarative animation DSL: leaf actions mutate
//! a target node's observable state, container actions compose them in
//! time, and durations that are only known later (sound-driven animations)
//! stay composable through the deferred-value algebra in `act-core`.
//!
//! Templates are built from [`Action`] factories and run through an
//! [`ActionRunner`]; the host loop ticks the runner once per frame with a
//! [`FrameContext`](act_core::FrameContext).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod instance;
pub mod runner;

mod evaluate;
mod prepare;

pub use action::{Action, CustomFn, RepeatCount, Rotation};
pub use instance::{ActionId, ActionInstance};
pub use runner::ActionRunner;

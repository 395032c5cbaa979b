//! Tooling primitives for the action scheduler (tracing/debug).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceSink, TraceTag, VecTraceSink};

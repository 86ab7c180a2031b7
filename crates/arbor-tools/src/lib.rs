//! Tooling primitives for the arbor behaviour tree runtime.
//!
//! Trees emit [`TraceEvent`]s through a [`Tracer`]; inspectors and debug UIs read them back from
//! a [`TraceLog`] or receive them live through a [`TraceSink`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, Tracer, VecTraceSink};

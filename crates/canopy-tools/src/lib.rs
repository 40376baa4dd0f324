//! Tracing primitives for canopy behavior trees.
//!
//! An executor reports what it does through a [`TraceSink`]; tooling (debuggers, replay viewers,
//! test probes) plugs in by implementing that trait.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, SharedTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink,
};

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use canopy_core::{Position, Status};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A small trace event describing one thing that happened to one runtime node.
///
/// This is "dumb data" so it can be recorded during a run and rendered later by tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    /// Executor cycle the event belongs to.
    pub cycle: u64,
    pub tag: Cow<'static, str>,
    /// Identity of the static descriptor the node was built from.
    pub descriptor: u64,
    pub position: Position,
    pub status: Status,
}

impl TraceEvent {
    pub fn new(cycle: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            cycle,
            tag: tag.into(),
            descriptor: 0,
            position: Position::root(),
            status: Status::Uninitialized,
        }
    }

    pub fn with_descriptor(mut self, descriptor: u64) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Sink handle shared by an executor and every executor nested inside it.
pub type SharedTraceSink = Rc<RefCell<dyn TraceSink>>;

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    pub fn count(&self, tag: &str) -> usize {
        self.events.iter().filter(|e| e.tag == tag).count()
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Forwards `event` to `sink` if one is attached. The event is built lazily so an executor
/// without a sink pays nothing.
pub fn emit(sink: Option<&SharedTraceSink>, event: impl FnOnce() -> TraceEvent) {
    if let Some(sink) = sink {
        sink.borrow_mut().emit(event());
    }
}

use canopy_core::{Position, Status, TaskState};

use crate::context::{Context, ContextRef};
use crate::error::BtResult;
use crate::executor::{Executor, NodeId, NodeList};

/// Runtime behaviour of an application-supplied leaf.
///
/// A fresh instance is built by the descriptor's factory every time the leaf is spawned. A leaf
/// that needs to be ticked must ask for it with [`LeafHandle::request_tick`], usually from
/// `spawn`; the engine never ticks a leaf on its own initiative.
pub trait LeafTask: 'static {
    fn spawn(&mut self, leaf: &mut LeafHandle<'_>) -> BtResult<()>;

    /// Must report `Running`, `Success` or `Failure`.
    fn tick(&mut self, leaf: &mut LeafHandle<'_>) -> Status;

    fn terminate(&mut self, _leaf: &mut LeafHandle<'_>) -> BtResult<()> {
        Ok(())
    }

    /// State persisted at the leaf's position when it finishes.
    fn store_state(&self) -> Option<TaskState> {
        None
    }

    /// State persisted at the leaf's position when it is terminated.
    fn store_termination_state(&self) -> Option<TaskState> {
        None
    }

    /// Called before `spawn` with whatever was last persisted at the leaf's position.
    fn restore_state(&mut self, _state: &TaskState) {}
}

/// What a leaf may see and do while one of its hooks runs.
pub struct LeafHandle<'a> {
    exec: &'a mut Executor,
    node: NodeId,
}

impl<'a> LeafHandle<'a> {
    pub(crate) fn new(exec: &'a mut Executor, node: NodeId) -> Self {
        Self { exec, node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn context(&self) -> ContextRef {
        self.exec.node_context(self.node)
    }

    pub fn position(&self) -> Position {
        self.exec.node_position(self.node).unwrap_or_default()
    }

    pub fn cycle(&self) -> u64 {
        self.exec.cycle()
    }

    /// Joins the tickable set at the end of the current pass.
    pub fn request_tick(&mut self) {
        self.exec.request_insertion(NodeList::Tickable, self.node);
    }

    /// Leaves the tickable set at the end of the current pass.
    pub fn stop_ticking(&mut self) {
        self.exec.request_removal(NodeList::Tickable, self.node);
    }

    pub fn executor(&mut self) -> &mut Executor {
        &mut *self.exec
    }
}

/// Leaf that evaluates a predicate over its context on every tick.
pub struct Condition<F> {
    predicate: F,
}

impl<F> Condition<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> LeafTask for Condition<F>
where
    F: FnMut(&dyn Context) -> bool + 'static,
{
    fn spawn(&mut self, leaf: &mut LeafHandle<'_>) -> BtResult<()> {
        leaf.request_tick();
        Ok(())
    }

    fn tick(&mut self, leaf: &mut LeafHandle<'_>) -> Status {
        let context = leaf.context();
        if (self.predicate)(&*context) {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

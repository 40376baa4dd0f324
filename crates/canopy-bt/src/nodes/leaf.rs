use std::rc::Rc;

use canopy_core::{Status, TaskState};

use super::{Behavior, Decorated};
use crate::error::BtResult;
use crate::executor::NodeCx;
use crate::leaf::{LeafHandle, LeafTask};

/// Reports a fixed outcome on its first tick.
pub(crate) struct Constant {
    status: Status,
}

impl Constant {
    pub(crate) fn new(status: Status) -> Self {
        Self { status }
    }
}

impl Behavior for Constant {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        cx.request_tick();
        Ok(())
    }

    fn tick(&mut self, _cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(self.status)
    }

    fn terminate(&mut self, _cx: &mut NodeCx<'_>) -> BtResult<()> {
        Ok(())
    }
}

/// Succeeds after being ticked `ticks` times.
pub(crate) struct Wait {
    ticks: u32,
    elapsed: u32,
}

impl Wait {
    pub(crate) fn new(ticks: u32) -> Self {
        Self { ticks, elapsed: 0 }
    }
}

impl Behavior for Wait {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.elapsed = 0;
        cx.request_tick();
        Ok(())
    }

    fn tick(&mut self, _cx: &mut NodeCx<'_>) -> BtResult<Status> {
        self.elapsed += 1;
        if self.elapsed >= self.ticks {
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }

    fn terminate(&mut self, _cx: &mut NodeCx<'_>) -> BtResult<()> {
        Ok(())
    }
}

/// Moves a context variable to a new name when spawned. A missing source clears the target.
pub(crate) struct RenameVariable {
    from: String,
    to: String,
}

impl RenameVariable {
    pub(crate) fn new(from: String, to: String) -> Self {
        Self { from, to }
    }
}

impl Behavior for RenameVariable {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        cx.request_tick();
        let context = cx.context();
        let value = context.get(&self.from);
        context.clear_one(&self.from);
        match value {
            Some(value) => {
                context.set(&self.to, value);
            }
            None => {
                context.clear_one(&self.to);
            }
        }
        Ok(())
    }

    fn tick(&mut self, _cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(Status::Success)
    }

    fn terminate(&mut self, _cx: &mut NodeCx<'_>) -> BtResult<()> {
        Ok(())
    }
}

/// Resolves a named tree through the context and runs it in place.
pub(crate) struct SubtreeLookup {
    tree: String,
    inner: Option<Decorated>,
}

impl SubtreeLookup {
    pub(crate) fn new(tree: String) -> Self {
        Self { tree, inner: None }
    }
}

impl Behavior for SubtreeLookup {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        let Some(tree) = context.lookup_tree(&self.tree) else {
            tracing::debug!(tree = %self.tree, "subtree not found");
            cx.request_tick();
            return Ok(());
        };
        tree.compute_positions();
        let mut inner = Decorated::new(tree);
        inner.spawn(cx, Rc::clone(&context))?;
        self.inner = Some(inner);
        Ok(())
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(self
            .inner
            .as_ref()
            .map_or(Status::Failure, |inner| inner.status(cx)))
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.terminate(cx),
            None => Ok(()),
        }
    }
}

/// Adapter running an application-supplied [`LeafTask`].
pub(crate) struct External {
    task: Box<dyn LeafTask>,
}

impl External {
    pub(crate) fn new(task: Box<dyn LeafTask>) -> Self {
        Self { task }
    }
}

impl Behavior for External {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.task.spawn(&mut LeafHandle::new(&mut *cx.exec, cx.node))
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(self.task.tick(&mut LeafHandle::new(&mut *cx.exec, cx.node)))
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.task.terminate(&mut LeafHandle::new(&mut *cx.exec, cx.node))
    }

    fn store_state(&self) -> Option<TaskState> {
        self.task.store_state()
    }

    fn store_termination_state(&self) -> Option<TaskState> {
        self.task.store_termination_state()
    }

    fn restore_state(&mut self, state: &TaskState) {
        self.task.restore_state(state);
    }
}

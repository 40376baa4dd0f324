use std::rc::Rc;

use canopy_core::{Status, TaskState, Value};

use super::{Behavior, Decorated};
use crate::context::{ContextRef, HierarchicalContext, SafeContext, SafeOutputContext};
use crate::descriptor::TaskDescriptor;
use crate::error::BtResult;
use crate::executor::NodeCx;

/// Task state variable holding how many times a limit decorator has spawned its child.
pub const RUNS_SO_FAR: &str = "runs_so_far";

/// Lets its child run at most `max_runs` times over the life of the tree position.
pub(crate) struct Limit {
    max_runs: u32,
    runs: u32,
    inner: Decorated,
}

impl Limit {
    pub(crate) fn new(max_runs: u32, child: Rc<TaskDescriptor>) -> Self {
        Self {
            max_runs,
            runs: 0,
            inner: Decorated::new(child),
        }
    }

    fn state(&self) -> TaskState {
        [(RUNS_SO_FAR, Value::from(self.runs))].into_iter().collect()
    }
}

impl Behavior for Limit {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        if self.runs < self.max_runs {
            self.runs += 1;
            let context = cx.context();
            self.inner.spawn(cx, context)
        } else {
            tracing::trace!(runs = self.runs, max = self.max_runs, "limit exhausted");
            cx.request_tick();
            Ok(())
        }
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(self.inner.status(cx))
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.inner.terminate(cx)
    }

    fn store_state(&self) -> Option<TaskState> {
        Some(self.state())
    }

    fn store_termination_state(&self) -> Option<TaskState> {
        Some(self.state())
    }

    fn restore_state(&mut self, state: &TaskState) {
        if let Some(runs) = state.get(RUNS_SO_FAR).and_then(Value::as_int) {
            self.runs = u32::try_from(runs).unwrap_or(u32::MAX);
        }
    }
}

/// Respawns its child every time it finishes. Never finishes itself.
pub(crate) struct Repeat {
    inner: Decorated,
}

impl Repeat {
    pub(crate) fn new(child: Rc<TaskDescriptor>) -> Self {
        Self {
            inner: Decorated::new(child),
        }
    }
}

impl Behavior for Repeat {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        self.inner.spawn(cx, context)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        if self.inner.status(cx) != Status::Running {
            self.inner.respawn(cx)?;
        }
        Ok(Status::Running)
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.inner.terminate(cx)
    }
}

/// Respawns its child while it succeeds and succeeds once it fails.
pub(crate) struct UntilFail {
    inner: Decorated,
}

impl UntilFail {
    pub(crate) fn new(child: Rc<TaskDescriptor>) -> Self {
        Self {
            inner: Decorated::new(child),
        }
    }
}

impl Behavior for UntilFail {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        self.inner.spawn(cx, context)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        match self.inner.status(cx) {
            Status::Failure => Ok(Status::Success),
            Status::Success => {
                self.inner.respawn(cx)?;
                Ok(Status::Running)
            }
            _ => Ok(Status::Running),
        }
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.inner.terminate(cx)
    }
}

pub(crate) struct Inverter {
    inner: Decorated,
}

impl Inverter {
    pub(crate) fn new(child: Rc<TaskDescriptor>) -> Self {
        Self {
            inner: Decorated::new(child),
        }
    }
}

impl Behavior for Inverter {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        self.inner.spawn(cx, context)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(match self.inner.status(cx) {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        })
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.inner.terminate(cx)
    }
}

pub(crate) struct Succeeder {
    inner: Decorated,
}

impl Succeeder {
    pub(crate) fn new(child: Rc<TaskDescriptor>) -> Self {
        Self {
            inner: Decorated::new(child),
        }
    }
}

impl Behavior for Succeeder {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        self.inner.spawn(cx, context)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(match self.inner.status(cx) {
            Status::Running => Status::Running,
            _ => Status::Success,
        })
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.inner.terminate(cx)
    }
}

pub(crate) enum ScopeKind {
    Hierarchical,
    Safe,
    SafeOutput(Vec<String>),
}

/// Runs its child under a context derived from its own; status passes through.
pub(crate) struct ContextScope {
    kind: ScopeKind,
    inner: Decorated,
}

impl ContextScope {
    pub(crate) fn new(kind: ScopeKind, child: Rc<TaskDescriptor>) -> Self {
        Self {
            kind,
            inner: Decorated::new(child),
        }
    }
}

impl Behavior for ContextScope {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let input = cx.context();
        let scoped: ContextRef = match &self.kind {
            ScopeKind::Hierarchical => Rc::new(HierarchicalContext::new(input)),
            ScopeKind::Safe => Rc::new(SafeContext::new(input)),
            ScopeKind::SafeOutput(outputs) => {
                Rc::new(SafeOutputContext::new(input, outputs.iter().cloned()))
            }
        };
        self.inner.spawn(cx, scoped)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        Ok(self.inner.status(cx))
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.inner.terminate(cx)
    }
}

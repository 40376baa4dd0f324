use std::rc::Rc;

use canopy_core::Status;

use super::{Behavior, Decorated};
use crate::descriptor::{DescriptorId, TaskDescriptor};
use crate::error::{BtError, BtResult};
use crate::executor::NodeCx;

/// Runs its child normally until someone forces it to finish with a chosen status.
///
/// While spawned and unresolved it is registered with the executor under its descriptor id,
/// which is how [`PerformInterruption`] leaves find it.
pub(crate) struct Interrupter {
    descriptor: DescriptorId,
    inner: Decorated,
    branch: Option<Rc<TaskDescriptor>>,
    branch_ticks: u32,
    forced: Option<Status>,
}

impl Interrupter {
    pub(crate) fn new(
        descriptor: DescriptorId,
        child: Rc<TaskDescriptor>,
        branch: Option<Rc<TaskDescriptor>>,
        branch_ticks: u32,
    ) -> Self {
        Self {
            descriptor,
            inner: Decorated::new(child),
            branch,
            branch_ticks,
            forced: None,
        }
    }

    /// Terminates the child, runs the branch if any, and arranges to report `status` on the
    /// next tick. A second interrupt is ignored.
    pub(crate) fn interrupt(&mut self, cx: &mut NodeCx<'_>, status: Status) -> BtResult<()> {
        if self.forced.is_some() {
            return Ok(());
        }
        if !matches!(status, Status::Success | Status::Failure) {
            return Err(BtError::InvalidInterruptStatus(status));
        }

        self.inner.terminate(cx)?;
        if let Some(branch) = &self.branch {
            let context = cx.context();
            let mut runner = cx.nested(Rc::clone(branch), context);
            runner.tick()?;
            let mut ticks = 0;
            while ticks < self.branch_ticks && runner.status() == Status::Running {
                runner.tick()?;
                ticks += 1;
            }
            runner.terminate()?;
        }

        // The terminated child will not tick again, so schedule ourselves to report.
        cx.request_tick();
        self.forced = Some(status);
        Ok(())
    }
}

impl Behavior for Interrupter {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        cx.register_interrupter(self.descriptor);
        let context = cx.context();
        self.inner.spawn(cx, context)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        if let Some(status) = self.forced {
            cx.unregister_interrupter(self.descriptor);
            return Ok(status);
        }
        let status = self.inner.status(cx);
        if status != Status::Running {
            cx.unregister_interrupter(self.descriptor);
        }
        Ok(status)
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        cx.unregister_interrupter(self.descriptor);
        if self.forced.is_some() {
            cx.cancel_tick_request();
        }
        self.inner.terminate(cx)
    }

    fn as_interrupter(&mut self) -> Option<&mut Interrupter> {
        Some(self)
    }
}

/// Leaf that interrupts live interrupters by descriptor id when spawned, then succeeds.
pub(crate) struct PerformInterruption {
    targets: Vec<DescriptorId>,
    desired: Status,
}

impl PerformInterruption {
    pub(crate) fn new(targets: Vec<DescriptorId>, desired: Status) -> Self {
        Self { targets, desired }
    }
}

impl Behavior for PerformInterruption {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        cx.request_tick();
        for &target in &self.targets {
            match cx.exec.find_interrupter(target) {
                Some(node) => cx.exec.interrupt(node, self.desired)?,
                None => tracing::debug!(interrupter = %target, "no live interrupter to interrupt"),
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

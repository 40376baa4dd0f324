use std::rc::Rc;

use canopy_core::Status;

use super::Behavior;
use crate::descriptor::{ParallelPolicy, TaskDescriptor};
use crate::error::BtResult;
use crate::executor::{NodeCx, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SerialMode {
    Sequence,
    Selector,
}

impl SerialMode {
    /// Child outcome that moves evaluation on to the next child.
    fn advances_on(self) -> Status {
        match self {
            SerialMode::Sequence => Status::Success,
            SerialMode::Selector => Status::Failure,
        }
    }
}

/// Sequence and selector, optionally visiting children in a per-spawn random order.
///
/// One child runs at a time. When it finishes with the advancing outcome the next child is
/// spawned; the other outcome ends the composite immediately.
pub(crate) struct Serial {
    mode: SerialMode,
    shuffle: bool,
    children: Vec<Rc<TaskDescriptor>>,
    order: Vec<usize>,
    index: usize,
    active: Option<NodeId>,
}

impl Serial {
    pub(crate) fn new(mode: SerialMode, shuffle: bool, children: Vec<Rc<TaskDescriptor>>) -> Self {
        Self {
            mode,
            shuffle,
            children,
            order: Vec::new(),
            index: 0,
            active: None,
        }
    }

    fn spawn_current(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let child = Rc::clone(&self.children[self.order[self.index]]);
        let context = cx.context();
        self.active = Some(cx.spawn_child(&child, context)?);
        Ok(())
    }
}

impl Behavior for Serial {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.order = if self.shuffle {
            cx.shuffled(self.children.len())
        } else {
            (0..self.children.len()).collect()
        };
        self.index = 0;
        self.spawn_current(cx)
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        let Some(active) = self.active else {
            return Ok(Status::Failure);
        };
        let status = cx.status_of(active).settled();
        if status == Status::Running {
            return Ok(Status::Running);
        }
        if status != self.mode.advances_on() || self.index + 1 >= self.children.len() {
            return Ok(status);
        }

        cx.discard(active)?;
        self.active = None;
        self.index += 1;
        self.spawn_current(cx)?;
        Ok(Status::Running)
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        match self.active {
            Some(active) => cx.terminate(active),
            None => Ok(()),
        }
    }
}

/// All children run side by side; the policy decides which outcome short-circuits.
pub(crate) struct Parallel {
    policy: ParallelPolicy,
    children: Vec<Rc<TaskDescriptor>>,
    active: Vec<NodeId>,
}

impl Parallel {
    pub(crate) fn new(policy: ParallelPolicy, children: Vec<Rc<TaskDescriptor>>) -> Self {
        Self {
            policy,
            children,
            active: Vec::new(),
        }
    }

    fn terminate_all(&self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        for &child in &self.active {
            cx.terminate(child)?;
        }
        Ok(())
    }
}

impl Behavior for Parallel {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        self.active = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let node = cx.spawn_child(child, Rc::clone(&context))?;
            self.active.push(node);
        }
        Ok(())
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        let (decisive, exhausted) = match self.policy {
            ParallelPolicy::Sequence => (Status::Failure, Status::Success),
            ParallelPolicy::Selector => (Status::Success, Status::Failure),
        };

        let mut running = false;
        for &child in &self.active {
            match cx.status_of(child).settled() {
                Status::Running => running = true,
                status if status == decisive => {
                    self.terminate_all(cx)?;
                    return Ok(decisive);
                }
                _ => {}
            }
        }

        Ok(if running { Status::Running } else { exhausted })
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        self.terminate_all(cx)
    }
}

use std::rc::Rc;

use canopy_core::Status;

use super::Behavior;
use crate::descriptor::TaskDescriptor;
use crate::error::BtResult;
use crate::executor::{Executor, NodeCx, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Selected(usize),
    Pending,
    Exhausted,
}

/// One nested executor per guarded child, evaluated under the list's context.
///
/// A child without a guard counts as an immediately succeeding guard.
struct GuardSet {
    guards: Vec<Option<Executor>>,
    results: Vec<Status>,
    /// Highest-priority guard not yet known to have failed.
    most_relevant: usize,
}

impl GuardSet {
    /// Builds and spawns one executor per guard.
    fn spawn(cx: &mut NodeCx<'_>, children: &[Rc<TaskDescriptor>]) -> BtResult<Self> {
        let context = cx.context();
        let mut guards = Vec::with_capacity(children.len());
        let mut results = Vec::with_capacity(children.len());
        for child in children {
            match child.guard() {
                Some(guard) => {
                    let mut exec = cx.nested(Rc::clone(guard), Rc::clone(&context));
                    exec.tick()?;
                    guards.push(Some(exec));
                    results.push(Status::Running);
                }
                None => {
                    guards.push(None);
                    results.push(Status::Success);
                }
            }
        }
        Ok(Self {
            guards,
            results,
            most_relevant: 0,
        })
    }

    /// Replaces every guard executor with a fresh, already spawned one that shares the old
    /// executor's task states.
    fn reset(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let context = cx.context();
        for (slot, result) in self.guards.iter_mut().zip(self.results.iter_mut()) {
            let Some(old) = slot.as_mut() else {
                continue;
            };
            old.terminate()?;
            let mut fresh = cx
                .nested(Rc::clone(old.tree()), Rc::clone(&context))
                .with_task_states(old.task_states().clone());
            fresh.tick()?;
            *slot = Some(fresh);
            *result = Status::Running;
        }
        self.most_relevant = 0;
        Ok(())
    }

    /// Ticks every unresolved guard once. Selects the first succeeding guard once none is
    /// running.
    fn evaluate_once(&mut self) -> BtResult<Verdict> {
        let mut pending = false;
        for (guard, result) in self.guards.iter_mut().zip(self.results.iter_mut()) {
            let Some(guard) = guard else {
                continue;
            };
            if *result == Status::Running {
                *result = guard.tick()?;
                pending |= *result == Status::Running;
            }
        }
        if pending {
            return Ok(Verdict::Pending);
        }
        Ok(self
            .results
            .iter()
            .position(|s| *s == Status::Success)
            .map_or(Verdict::Exhausted, Verdict::Selected))
    }

    /// Long-ticks every unresolved guard and reports as soon as the most relevant one decides.
    fn evaluate_relevant(&mut self, cap: u32) -> BtResult<Verdict> {
        let count = self.guards.len();
        for i in 0..count {
            let Some(guard) = self.guards[i].as_mut() else {
                if i == self.most_relevant {
                    return Ok(Verdict::Selected(i));
                }
                continue;
            };
            if self.results[i] != Status::Running {
                continue;
            }
            let status = long_tick(guard, cap)?;
            self.results[i] = status;
            if status == Status::Running || i != self.most_relevant {
                continue;
            }
            if status == Status::Success {
                return Ok(Verdict::Selected(i));
            }

            // The most relevant guard failed: wait on the next running guard, or take the next
            // one that already succeeded.
            let mut waiting = false;
            for k in (i + 1)..count {
                match self.guards[k].as_ref().map(Executor::status) {
                    None | Some(Status::Success) => return Ok(Verdict::Selected(k)),
                    Some(Status::Running) => {
                        self.most_relevant = k;
                        waiting = true;
                        break;
                    }
                    Some(_) => {}
                }
            }
            if !waiting {
                return Ok(Verdict::Exhausted);
            }
        }
        Ok(Verdict::Pending)
    }

    fn terminate(&mut self) -> BtResult<()> {
        for guard in self.guards.iter_mut().flatten() {
            guard.terminate()?;
        }
        Ok(())
    }
}

/// Ticks `guard` until it stops running, at most `cap` times.
fn long_tick(guard: &mut Executor, cap: u32) -> BtResult<Status> {
    let mut ticks = 0;
    while matches!(guard.status(), Status::Running | Status::Uninitialized) {
        guard.tick()?;
        ticks += 1;
        if ticks >= cap {
            break;
        }
    }
    Ok(guard.status())
}

/// Picks one child by its guards and then sticks with it.
pub(crate) struct StaticPriorityList {
    children: Vec<Rc<TaskDescriptor>>,
    guards: Option<GuardSet>,
    active: Option<NodeId>,
    spawn_failed: bool,
}

impl StaticPriorityList {
    pub(crate) fn new(children: Vec<Rc<TaskDescriptor>>) -> Self {
        Self {
            children,
            guards: None,
            active: None,
            spawn_failed: false,
        }
    }

    fn activate(&mut self, cx: &mut NodeCx<'_>, index: usize) -> BtResult<()> {
        let child = Rc::clone(&self.children[index]);
        let context = cx.context();
        self.active = Some(cx.spawn_child(&child, context)?);
        Ok(())
    }
}

impl Behavior for StaticPriorityList {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        let mut guards = GuardSet::spawn(cx, &self.children)?;
        let verdict = guards.evaluate_once()?;
        self.guards = Some(guards);
        match verdict {
            Verdict::Selected(index) => self.activate(cx, index)?,
            Verdict::Pending => cx.request_tick(),
            Verdict::Exhausted => {
                self.spawn_failed = true;
                cx.request_tick();
            }
        }
        Ok(())
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        if self.spawn_failed {
            return Ok(Status::Failure);
        }
        if let Some(active) = self.active {
            return Ok(cx.status_of(active).settled());
        }
        let Some(guards) = self.guards.as_mut() else {
            return Ok(Status::Failure);
        };
        match guards.evaluate_once()? {
            Verdict::Selected(index) => {
                self.activate(cx, index)?;
                cx.stop_ticking();
                Ok(Status::Running)
            }
            Verdict::Pending => Ok(Status::Running),
            Verdict::Exhausted => Ok(Status::Failure),
        }
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        if let Some(active) = self.active {
            cx.terminate(active)?;
        }
        match self.guards.as_mut() {
            Some(guards) => guards.terminate(),
            None => Ok(()),
        }
    }
}

/// Re-evaluates guards on every tick for as long as it runs, switching to a higher-priority
/// child as soon as that child's guard succeeds.
pub(crate) struct DynamicPriorityList {
    children: Vec<Rc<TaskDescriptor>>,
    guards: Option<GuardSet>,
    active: Option<(usize, NodeId)>,
    spawn_failed: bool,
}

impl DynamicPriorityList {
    pub(crate) fn new(children: Vec<Rc<TaskDescriptor>>) -> Self {
        Self {
            children,
            guards: None,
            active: None,
            spawn_failed: false,
        }
    }

    fn activate(&mut self, cx: &mut NodeCx<'_>, index: usize) -> BtResult<()> {
        let child = Rc::clone(&self.children[index]);
        let context = cx.context();
        let node = cx.spawn_child(&child, context)?;
        self.active = Some((index, node));
        self.reset_guards(cx)
    }

    fn reset_guards(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        match self.guards.as_mut() {
            Some(guards) => guards.reset(cx),
            None => Ok(()),
        }
    }
}

impl Behavior for DynamicPriorityList {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        cx.request_tick();
        let mut guards = GuardSet::spawn(cx, &self.children)?;
        let verdict = guards.evaluate_relevant(cx.config().long_tick_cap)?;
        self.guards = Some(guards);
        match verdict {
            Verdict::Selected(index) => self.activate(cx, index)?,
            Verdict::Pending => {}
            Verdict::Exhausted => self.spawn_failed = true,
        }
        Ok(())
    }

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status> {
        if self.spawn_failed {
            return Ok(Status::Failure);
        }
        let cap = cx.config().long_tick_cap;
        let Some(guards) = self.guards.as_mut() else {
            return Ok(Status::Failure);
        };
        let verdict = guards.evaluate_relevant(cap)?;

        let Some((current, active)) = self.active else {
            return match verdict {
                Verdict::Selected(index) => {
                    self.activate(cx, index)?;
                    Ok(Status::Running)
                }
                Verdict::Pending => Ok(Status::Running),
                Verdict::Exhausted => Ok(Status::Failure),
            };
        };

        match verdict {
            Verdict::Selected(index) if index != current => {
                cx.discard(active)?;
                self.active = None;
                self.activate(cx, index)?;
                Ok(Status::Running)
            }
            Verdict::Selected(_) => {
                self.reset_guards(cx)?;
                Ok(cx.status_of(active).settled())
            }
            Verdict::Pending => Ok(cx.status_of(active).settled()),
            Verdict::Exhausted => {
                cx.terminate(active)?;
                Ok(Status::Failure)
            }
        }
    }

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        if let Some((_, active)) = self.active {
            cx.terminate(active)?;
        }
        match self.guards.as_mut() {
            Some(guards) => guards.terminate(),
            None => Ok(()),
        }
    }
}

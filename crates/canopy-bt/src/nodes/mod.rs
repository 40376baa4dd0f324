//! Runtime behaviour of every task kind.
//!
//! [`create`] is the single place where a static [`TaskKind`] is turned into the strategy a
//! runtime node delegates to.

mod composite;
mod decorator;
mod interrupter;
mod leaf;
mod priority;

use std::rc::Rc;

use canopy_core::{Position, Status, TaskState};

use crate::context::ContextRef;
use crate::descriptor::{TaskDescriptor, TaskKind};
use crate::error::{BtError, BtResult};
use crate::executor::{NodeCx, NodeId};

use composite::{Parallel, Serial, SerialMode};
pub use decorator::RUNS_SO_FAR;
use decorator::{ContextScope, Inverter, Limit, Repeat, ScopeKind, Succeeder, UntilFail};
pub(crate) use interrupter::Interrupter;
use interrupter::PerformInterruption;
use leaf::{Constant, External, RenameVariable, SubtreeLookup, Wait};
use priority::{DynamicPriorityList, StaticPriorityList};

/// Kind-specific half of a runtime node. The executor owns the common lifecycle (status,
/// always-fail override, scheduling, state persistence); a behavior only decides what its own
/// node does.
pub(crate) trait Behavior {
    fn spawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()>;

    fn tick(&mut self, cx: &mut NodeCx<'_>) -> BtResult<Status>;

    fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()>;

    fn store_state(&self) -> Option<TaskState> {
        None
    }

    fn store_termination_state(&self) -> Option<TaskState> {
        None
    }

    fn restore_state(&mut self, _state: &TaskState) {}

    fn as_interrupter(&mut self) -> Option<&mut Interrupter> {
        None
    }
}

pub(crate) fn create(
    descriptor: &TaskDescriptor,
    position: &Position,
) -> BtResult<Box<dyn Behavior>> {
    let kind = descriptor.kind();
    let children = descriptor.children().to_vec();
    if !kind.is_leaf() && children.is_empty() {
        return Err(BtError::EmptyComposite {
            kind: kind.name(),
            position: position.clone(),
        });
    }
    let child = || Rc::clone(&descriptor.children()[0]);

    let behavior: Box<dyn Behavior> = match kind {
        TaskKind::Sequence => Box::new(Serial::new(SerialMode::Sequence, false, children)),
        TaskKind::Selector => Box::new(Serial::new(SerialMode::Selector, false, children)),
        TaskKind::RandomSequence => Box::new(Serial::new(SerialMode::Sequence, true, children)),
        TaskKind::RandomSelector => Box::new(Serial::new(SerialMode::Selector, true, children)),
        TaskKind::Parallel(policy) => Box::new(Parallel::new(*policy, children)),
        TaskKind::StaticPriorityList => Box::new(StaticPriorityList::new(children)),
        TaskKind::DynamicPriorityList => Box::new(DynamicPriorityList::new(children)),
        TaskKind::Interrupter {
            branch,
            branch_ticks,
        } => Box::new(Interrupter::new(
            descriptor.id(),
            child(),
            branch.clone(),
            *branch_ticks,
        )),
        TaskKind::Limit { max_runs } => Box::new(Limit::new(*max_runs, child())),
        TaskKind::Repeat => Box::new(Repeat::new(child())),
        TaskKind::UntilFail => Box::new(UntilFail::new(child())),
        TaskKind::Inverter => Box::new(Inverter::new(child())),
        TaskKind::Succeeder => Box::new(Succeeder::new(child())),
        TaskKind::HierarchicalContext => {
            Box::new(ContextScope::new(ScopeKind::Hierarchical, child()))
        }
        TaskKind::SafeContext => Box::new(ContextScope::new(ScopeKind::Safe, child())),
        TaskKind::SafeOutputContext { outputs } => Box::new(ContextScope::new(
            ScopeKind::SafeOutput(outputs.clone()),
            child(),
        )),
        TaskKind::PerformInterruption { targets, desired } => {
            Box::new(PerformInterruption::new(targets.clone(), *desired))
        }
        TaskKind::SubtreeLookup { tree } => Box::new(SubtreeLookup::new(tree.clone())),
        TaskKind::Success => Box::new(Constant::new(Status::Success)),
        TaskKind::Failure => Box::new(Constant::new(Status::Failure)),
        TaskKind::Wait { ticks } => Box::new(Wait::new(*ticks)),
        TaskKind::VariableRenamer { from, to } => {
            Box::new(RenameVariable::new(from.clone(), to.clone()))
        }
        TaskKind::Action(factory) | TaskKind::Condition(factory) => {
            Box::new(External::new(factory()))
        }
    };
    Ok(behavior)
}

/// A decorator's single child: its descriptor and, once spawned, its runtime node.
pub(crate) struct Decorated {
    child: Rc<TaskDescriptor>,
    active: Option<NodeId>,
}

impl Decorated {
    pub(crate) fn new(child: Rc<TaskDescriptor>) -> Self {
        Self {
            child,
            active: None,
        }
    }

    pub(crate) fn spawn(&mut self, cx: &mut NodeCx<'_>, context: ContextRef) -> BtResult<()> {
        let node = cx.spawn_child(&self.child, context)?;
        self.active = Some(node);
        Ok(())
    }

    /// Replaces the finished child with a freshly spawned one under the same context.
    pub(crate) fn respawn(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        if let Some(node) = self.active.take() {
            cx.discard(node)?;
        }
        let context = cx.context();
        self.spawn(cx, context)
    }

    /// Child status with `Terminated` folded into `Failure`; `Failure` if never spawned.
    pub(crate) fn status(&self, cx: &NodeCx<'_>) -> Status {
        self.active
            .map_or(Status::Failure, |node| cx.status_of(node).settled())
    }

    pub(crate) fn terminate(&mut self, cx: &mut NodeCx<'_>) -> BtResult<()> {
        match self.active {
            Some(node) => cx.terminate(node),
            None => Ok(()),
        }
    }
}

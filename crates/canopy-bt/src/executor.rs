use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use canopy_core::{DeterministicRng, Position, SplitMix64, Status, TaskState, TaskStateStore};
use canopy_tools::{emit as trace_emit, SharedTraceSink, TraceEvent};

use crate::config::ExecutorConfig;
use crate::context::{BasicContext, ContextRef};
use crate::descriptor::{DescriptorId, TaskDescriptor};
use crate::error::{BtError, BtResult};
use crate::nodes::{self, Behavior};

/// Handle of one runtime node inside an [`Executor`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// The two node sets an executor maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeList {
    /// Nodes ticked on every cycle, in insertion order.
    Tickable,
    /// Nodes that belong to the live tree without being ticked. No built-in task uses it.
    Open,
}

/// A node set plus its pending mutations. Requests are applied only between tick passes.
#[derive(Debug, Default)]
struct Schedule {
    live: Vec<NodeId>,
    insertions: Vec<NodeId>,
    removals: Vec<NodeId>,
}

impl Schedule {
    fn request_insertion(&mut self, node: NodeId) {
        if !self.insertions.contains(&node) {
            self.insertions.push(node);
        }
    }

    fn request_removal(&mut self, node: NodeId) {
        if !self.removals.contains(&node) {
            self.removals.push(node);
        }
    }

    fn cancel_insertion(&mut self, node: NodeId) {
        self.insertions.retain(|n| *n != node);
    }

    fn cancel_removal(&mut self, node: NodeId) {
        self.removals.retain(|n| *n != node);
    }

    /// Insertions first, then removals.
    fn apply(&mut self) {
        for node in self.insertions.drain(..) {
            if !self.live.contains(&node) {
                self.live.push(node);
            }
        }
        if !self.removals.is_empty() {
            let removals = std::mem::take(&mut self.removals);
            self.live.retain(|n| !removals.contains(n));
        }
    }
}

struct NodeSlot {
    descriptor: Rc<TaskDescriptor>,
    parent: Option<NodeId>,
    position: Position,
    status: Status,
    spawned: bool,
    terminated: bool,
    always_fail: bool,
    context: Option<ContextRef>,
    children: Vec<NodeId>,
    /// `None` while one of the node's own hooks is running.
    behavior: Option<Box<dyn Behavior>>,
    teardown_pending: bool,
    interrupt_pending: Option<Status>,
}

impl NodeSlot {
    fn is_live(&self) -> bool {
        self.spawned && !self.terminated && self.status == Status::Running
    }
}

/// Runs one behavior tree against one root context.
///
/// The first [`tick`](Self::tick) spawns the root; every later tick visits the tickable set.
/// Nodes report status changes to their parent synchronously, so a single tick can resolve a
/// whole branch. Membership changes requested while ticking are buffered and applied before and
/// after each pass.
pub struct Executor {
    tree: Rc<TaskDescriptor>,
    context: ContextRef,
    config: ExecutorConfig,
    rng: SplitMix64,
    nodes: BTreeMap<NodeId, NodeSlot>,
    next_node: u64,
    root: Option<NodeId>,
    tickable: Schedule,
    open: Schedule,
    interrupters: BTreeMap<DescriptorId, NodeId>,
    task_states: TaskStateStore,
    trace: Option<SharedTraceSink>,
    cycle: u64,
}

impl Executor {
    pub fn new(tree: Rc<TaskDescriptor>, context: ContextRef) -> Self {
        tree.compute_positions();
        let config = ExecutorConfig::default();
        Self {
            tree,
            context,
            rng: SplitMix64::new(config.seed),
            config,
            nodes: BTreeMap::new(),
            next_node: 0,
            root: None,
            tickable: Schedule::default(),
            open: Schedule::default(),
            interrupters: BTreeMap::new(),
            task_states: TaskStateStore::new(),
            trace: None,
            cycle: 0,
        }
    }

    /// Executor over an empty [`BasicContext`].
    pub fn with_basic_context(tree: Rc<TaskDescriptor>) -> Self {
        Self::new(tree, Rc::new(BasicContext::new()))
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.rng = SplitMix64::new(config.seed);
        self.config = config;
        self
    }

    pub fn with_trace_sink(mut self, sink: SharedTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Reads and writes task states through `store`, which may be shared with other executors.
    pub fn with_task_states(mut self, store: TaskStateStore) -> Self {
        self.task_states = store;
        self
    }

    /// Executor for a guard or branch tree run on behalf of a node of this one.
    pub(crate) fn nested(&mut self, tree: Rc<TaskDescriptor>, context: ContextRef) -> Executor {
        let config = self.config.with_seed(self.rng.next_u64());
        let mut nested = Executor::new(tree, context).with_config(config);
        nested.trace = self.trace.clone();
        nested
    }

    pub fn tree(&self) -> &Rc<TaskDescriptor> {
        &self.tree
    }

    pub fn root_context(&self) -> &ContextRef {
        &self.context
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    pub fn task_states(&self) -> &TaskStateStore {
        &self.task_states
    }

    /// Number of ticks started so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// `Uninitialized` until the first tick, then the status of the root node.
    pub fn status(&self) -> Status {
        self.root
            .and_then(|root| self.nodes.get(&root))
            .map_or(Status::Uninitialized, |slot| slot.status)
    }

    pub fn tickable(&self) -> &[NodeId] {
        &self.tickable.live
    }

    pub fn tickable_len(&self) -> usize {
        self.tickable.live.len()
    }

    pub fn open_len(&self) -> usize {
        self.open.live.len()
    }

    pub fn node_status(&self, node: NodeId) -> Option<Status> {
        self.nodes.get(&node).map(|slot| slot.status)
    }

    pub fn node_position(&self, node: NodeId) -> Option<Position> {
        self.nodes.get(&node).map(|slot| slot.position.clone())
    }

    pub fn node_descriptor(&self, node: NodeId) -> Option<&Rc<TaskDescriptor>> {
        self.nodes.get(&node).map(|slot| &slot.descriptor)
    }

    pub(crate) fn node_context(&self, node: NodeId) -> ContextRef {
        self.nodes
            .get(&node)
            .and_then(|slot| slot.context.clone())
            .unwrap_or_else(|| Rc::clone(&self.context))
    }

    pub fn tick(&mut self) -> BtResult<Status> {
        let status = self.status();
        if status.is_finished() {
            return Ok(status);
        }

        self.cycle += 1;
        self.apply_pending();

        match self.root {
            None => {
                let tree = Rc::clone(&self.tree);
                let position = tree.position();
                tracing::debug!(cycle = self.cycle, kind = tree.kind().name(), "spawning root task");
                let root = self.create_node(tree, None, position)?;
                self.root = Some(root);
                let context = Rc::clone(&self.context);
                self.spawn_node(root, context)?;
            }
            Some(_) => {
                // Length is stable for the whole pass: membership only changes in apply_pending.
                for i in 0..self.tickable.live.len() {
                    let node = self.tickable.live[i];
                    if self.is_live(node) {
                        self.tick_node(node)?;
                    }
                }
            }
        }

        self.apply_pending();
        Ok(self.status())
    }

    /// Terminates the root node. Safe to call before the first tick and more than once.
    pub fn terminate(&mut self) -> BtResult<()> {
        if let Some(root) = self.root {
            tracing::debug!(cycle = self.cycle, "terminating tree");
            self.terminate_node(root)?;
            self.apply_pending();
        }
        Ok(())
    }

    pub fn request_insertion(&mut self, list: NodeList, node: NodeId) {
        self.schedule_mut(list).request_insertion(node);
    }

    pub fn request_removal(&mut self, list: NodeList, node: NodeId) {
        self.schedule_mut(list).request_removal(node);
    }

    pub fn cancel_insertion_request(&mut self, list: NodeList, node: NodeId) {
        self.schedule_mut(list).cancel_insertion(node);
    }

    pub fn cancel_removal_request(&mut self, list: NodeList, node: NodeId) {
        self.schedule_mut(list).cancel_removal(node);
    }

    fn schedule_mut(&mut self, list: NodeList) -> &mut Schedule {
        match list {
            NodeList::Tickable => &mut self.tickable,
            NodeList::Open => &mut self.open,
        }
    }

    fn apply_pending(&mut self) {
        self.tickable.apply();
        self.open.apply();
    }

    /// Live interrupter node built from `descriptor`, if any.
    pub fn find_interrupter(&self, descriptor: DescriptorId) -> Option<NodeId> {
        self.interrupters.get(&descriptor).copied()
    }

    pub(crate) fn register_interrupter(&mut self, descriptor: DescriptorId, node: NodeId) {
        self.interrupters.entry(descriptor).or_insert(node);
    }

    pub(crate) fn unregister_interrupter(&mut self, descriptor: DescriptorId, node: NodeId) {
        if self.interrupters.get(&descriptor) == Some(&node) {
            self.interrupters.remove(&descriptor);
        }
    }

    /// Forces the interrupter `node` to finish with `status` on the next tick.
    ///
    /// Interrupting a terminated, finished or already interrupted node has no effect.
    pub fn interrupt(&mut self, node: NodeId, status: Status) -> BtResult<()> {
        let slot = self.slot(node)?;
        if !slot.spawned {
            return Err(BtError::NotSpawned {
                position: slot.position.clone(),
            });
        }
        if slot.terminated || slot.status.is_finished() {
            return Ok(());
        }
        if !matches!(status, Status::Success | Status::Failure) {
            return Err(BtError::InvalidInterruptStatus(status));
        }
        let position = slot.position.clone();
        let descriptor = slot.descriptor.id();

        tracing::debug!(node = %node, %position, ?status, "interrupting task");
        trace_emit(self.trace.as_ref(), || {
            TraceEvent::new(self.cycle, "bt.interrupt")
                .with_descriptor(descriptor.get())
                .with_position(position.clone())
                .with_status(status)
        });

        let Some(mut behavior) = self.take_behavior(node) else {
            if let Some(slot) = self.nodes.get_mut(&node) {
                slot.interrupt_pending.get_or_insert(status);
            }
            return Ok(());
        };
        let outcome = match behavior.as_interrupter() {
            Some(interrupter) => interrupter.interrupt(&mut NodeCx::new(self, node), status),
            None => Err(BtError::NotAnInterrupter { position }),
        };
        self.restore_behavior(node, behavior)?;
        outcome
    }

    pub fn task_state(&self, position: &Position) -> Option<TaskState> {
        self.task_states.get(position)
    }

    pub fn set_task_state(&self, position: Position, state: TaskState) -> bool {
        self.task_states.set(position, state)
    }

    pub fn clear_task_state(&self, position: &Position) -> bool {
        self.task_states.clear(position)
    }

    fn slot(&self, node: NodeId) -> BtResult<&NodeSlot> {
        self.nodes.get(&node).ok_or(BtError::UnknownNode(node))
    }

    fn is_live(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(NodeSlot::is_live)
    }

    fn create_node(
        &mut self,
        descriptor: Rc<TaskDescriptor>,
        parent: Option<NodeId>,
        position: Position,
    ) -> BtResult<NodeId> {
        let behavior = nodes::create(&descriptor, &position)?;
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            NodeSlot {
                always_fail: descriptor.always_fails(),
                descriptor,
                parent,
                position,
                status: Status::Uninitialized,
                spawned: false,
                terminated: false,
                context: None,
                children: Vec::new(),
                behavior: Some(behavior),
                teardown_pending: false,
                interrupt_pending: None,
            },
        );
        Ok(id)
    }

    pub(crate) fn spawn_child(
        &mut self,
        parent: NodeId,
        descriptor: &Rc<TaskDescriptor>,
        context: ContextRef,
    ) -> BtResult<NodeId> {
        let base = self.slot(parent)?.position.clone();
        // Roots of looked-up trees carry no move of their own and share their parent's position.
        let position = match descriptor.position().last_move() {
            Some(index) => base.child(index),
            None => base,
        };
        let child = self.create_node(Rc::clone(descriptor), Some(parent), position)?;
        if let Some(slot) = self.nodes.get_mut(&parent) {
            slot.children.push(child);
        }
        self.spawn_node(child, context)?;
        Ok(child)
    }

    pub(crate) fn spawn_node(&mut self, node: NodeId, context: ContextRef) -> BtResult<()> {
        let slot = self.nodes.get_mut(&node).ok_or(BtError::UnknownNode(node))?;
        if slot.spawned {
            return Err(BtError::AlreadySpawned {
                position: slot.position.clone(),
            });
        }
        slot.spawned = true;
        slot.status = Status::Running;
        slot.context = Some(context);
        let position = slot.position.clone();
        let descriptor = slot.descriptor.id();
        tracing::trace!(node = %node, %position, kind = slot.descriptor.kind().name(), "spawn");

        trace_emit(self.trace.as_ref(), || {
            TraceEvent::new(self.cycle, "bt.spawn")
                .with_descriptor(descriptor.get())
                .with_position(position.clone())
                .with_status(Status::Running)
        });

        let restored = self.task_states.get(&position);
        let Some(mut behavior) = self.take_behavior(node) else {
            return Ok(());
        };
        if let Some(state) = restored {
            behavior.restore_state(&state);
        }
        let outcome = behavior.spawn(&mut NodeCx::new(self, node));
        self.restore_behavior(node, behavior)?;
        outcome
    }

    pub(crate) fn tick_node(&mut self, node: NodeId) -> BtResult<Status> {
        let slot = self.slot(node)?;
        if !slot.spawned {
            return Err(BtError::NotSpawned {
                position: slot.position.clone(),
            });
        }
        if !slot.is_live() {
            return Err(BtError::NotTickable {
                position: slot.position.clone(),
                status: slot.status,
            });
        }
        let position = slot.position.clone();
        let descriptor = slot.descriptor.id();
        tracing::trace!(node = %node, %position, "tick");

        trace_emit(self.trace.as_ref(), || {
            TraceEvent::new(self.cycle, "bt.tick")
                .with_descriptor(descriptor.get())
                .with_position(position.clone())
                .with_status(Status::Running)
        });

        let Some(mut behavior) = self.take_behavior(node) else {
            // Already evaluating further up the stack.
            return Ok(Status::Running);
        };
        let outcome = behavior.tick(&mut NodeCx::new(self, node));
        let stored = match &outcome {
            Ok(status) if status.is_finished() => behavior.store_state(),
            _ => None,
        };
        self.restore_behavior(node, behavior)?;
        let status = outcome?;

        if !status.is_tick_result() {
            tracing::warn!(node = %node, %position, ?status, "task reported an illegal status");
            return Err(BtError::IllegalStatus { position, status });
        }

        let Some(slot) = self.nodes.get_mut(&node) else {
            return Ok(Status::Terminated);
        };
        if slot.terminated {
            return Ok(slot.status);
        }
        let status = if slot.always_fail && status == Status::Success {
            Status::Failure
        } else {
            status
        };
        let previous = std::mem::replace(&mut slot.status, status);
        let parent = slot.parent;

        if status != Status::Running {
            if let Some(state) = stored {
                self.task_states.set(position, state);
            }
            self.tickable.request_removal(node);
            self.open.request_removal(node);
        }

        if previous != status {
            if let Some(parent) = parent {
                self.child_status_changed(parent)?;
            }
        }
        Ok(status)
    }

    /// Parents re-evaluate as soon as a child's status changes.
    fn child_status_changed(&mut self, parent: NodeId) -> BtResult<()> {
        match self.nodes.get(&parent) {
            Some(slot) if slot.is_live() && slot.behavior.is_some() => {
                self.tick_node(parent).map(drop)
            }
            _ => Ok(()),
        }
    }

    /// Tears down `node` and everything below it. Unspawned, finished and already terminated
    /// nodes are left alone.
    pub(crate) fn terminate_node(&mut self, node: NodeId) -> BtResult<()> {
        let Some(slot) = self.nodes.get_mut(&node) else {
            return Ok(());
        };
        if !slot.spawned || slot.terminated || slot.status.is_finished() {
            return Ok(());
        }
        slot.terminated = true;
        slot.status = Status::Terminated;
        let position = slot.position.clone();
        let descriptor = slot.descriptor.id();
        let behavior = slot.behavior.take();
        if behavior.is_none() {
            slot.teardown_pending = true;
        }
        tracing::trace!(node = %node, %position, "terminate");

        trace_emit(self.trace.as_ref(), || {
            TraceEvent::new(self.cycle, "bt.terminate")
                .with_descriptor(descriptor.get())
                .with_position(position.clone())
                .with_status(Status::Terminated)
        });

        self.tickable.request_removal(node);
        self.open.request_removal(node);
        match behavior {
            Some(behavior) => self.teardown(node, behavior, position),
            None => Ok(()),
        }
    }

    fn teardown(
        &mut self,
        node: NodeId,
        mut behavior: Box<dyn Behavior>,
        position: Position,
    ) -> BtResult<()> {
        let outcome = behavior.terminate(&mut NodeCx::new(self, node));
        if let Some(state) = behavior.store_termination_state() {
            self.task_states.set(position, state);
        }
        if let Some(slot) = self.nodes.get_mut(&node) {
            slot.behavior = Some(behavior);
        }
        outcome
    }

    /// Terminates `node` and frees it together with its whole subtree.
    ///
    /// Only finished or terminated children are released, never a node whose own hook is still
    /// running.
    pub(crate) fn release_node(&mut self, node: NodeId) -> BtResult<()> {
        self.terminate_node(node)?;
        match self.nodes.remove(&node) {
            Some(slot) => self.forget(node, slot),
            None => Ok(()),
        }
    }

    fn forget(&mut self, node: NodeId, slot: NodeSlot) -> BtResult<()> {
        for child in slot.children {
            self.release_node(child)?;
        }
        for schedule in [&mut self.tickable, &mut self.open] {
            schedule.cancel_insertion(node);
            schedule.request_removal(node);
        }
        self.interrupters.retain(|_, n| *n != node);
        Ok(())
    }

    pub(crate) fn discard_child(&mut self, parent: NodeId, child: NodeId) -> BtResult<()> {
        self.release_node(child)?;
        if let Some(slot) = self.nodes.get_mut(&parent) {
            slot.children.retain(|c| *c != child);
        }
        Ok(())
    }

    fn take_behavior(&mut self, node: NodeId) -> Option<Box<dyn Behavior>> {
        self.nodes.get_mut(&node)?.behavior.take()
    }

    /// Hands the behavior back to its slot and runs whatever was deferred while it was out.
    fn restore_behavior(&mut self, node: NodeId, behavior: Box<dyn Behavior>) -> BtResult<()> {
        let Some(slot) = self.nodes.get_mut(&node) else {
            return Ok(());
        };
        let teardown = std::mem::take(&mut slot.teardown_pending);
        let interrupt = slot.interrupt_pending.take();

        if teardown {
            let position = slot.position.clone();
            self.teardown(node, behavior, position)?;
        } else {
            slot.behavior = Some(behavior);
            if let Some(status) = interrupt {
                self.interrupt(node, status)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("tree", &self.tree.kind())
            .field("status", &self.status())
            .field("cycle", &self.cycle)
            .field("nodes", &self.nodes.len())
            .field("tickable", &self.tickable.live)
            .finish_non_exhaustive()
    }
}

/// A node's view of its executor while one of its hooks runs.
pub(crate) struct NodeCx<'a> {
    pub(crate) exec: &'a mut Executor,
    pub(crate) node: NodeId,
}

impl<'a> NodeCx<'a> {
    pub(crate) fn new(exec: &'a mut Executor, node: NodeId) -> Self {
        Self { exec, node }
    }

    pub(crate) fn context(&self) -> ContextRef {
        self.exec.node_context(self.node)
    }

    pub(crate) fn config(&self) -> ExecutorConfig {
        self.exec.config
    }

    pub(crate) fn spawn_child(
        &mut self,
        descriptor: &Rc<TaskDescriptor>,
        context: ContextRef,
    ) -> BtResult<NodeId> {
        self.exec.spawn_child(self.node, descriptor, context)
    }

    /// Status of a child; a child that no longer exists reads as `Terminated`.
    pub(crate) fn status_of(&self, child: NodeId) -> Status {
        self.exec.node_status(child).unwrap_or(Status::Terminated)
    }

    pub(crate) fn terminate(&mut self, child: NodeId) -> BtResult<()> {
        self.exec.terminate_node(child)
    }

    /// Terminates and frees a child that is being replaced.
    pub(crate) fn discard(&mut self, child: NodeId) -> BtResult<()> {
        self.exec.discard_child(self.node, child)
    }

    pub(crate) fn request_tick(&mut self) {
        self.exec.request_insertion(NodeList::Tickable, self.node);
    }

    pub(crate) fn stop_ticking(&mut self) {
        self.exec.request_removal(NodeList::Tickable, self.node);
    }

    pub(crate) fn cancel_tick_request(&mut self) {
        self.exec.cancel_insertion_request(NodeList::Tickable, self.node);
    }

    pub(crate) fn register_interrupter(&mut self, descriptor: DescriptorId) {
        self.exec.register_interrupter(descriptor, self.node);
    }

    pub(crate) fn unregister_interrupter(&mut self, descriptor: DescriptorId) {
        self.exec.unregister_interrupter(descriptor, self.node);
    }

    pub(crate) fn nested(&mut self, tree: Rc<TaskDescriptor>, context: ContextRef) -> Executor {
        self.exec.nested(tree, context)
    }

    /// A fresh permutation of `0..len`.
    pub(crate) fn shuffled(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        self.exec.rng.shuffle(&mut order);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(tree: TaskDescriptor) -> Executor {
        Executor::with_basic_context(tree.into_tree())
    }

    #[test]
    fn spawning_twice_is_rejected() {
        let mut exec = executor(TaskDescriptor::success());
        exec.tick().unwrap();
        let root = exec.root().unwrap();
        let context = Rc::clone(exec.root_context());

        let err = exec.spawn_node(root, context).unwrap_err();
        assert_eq!(
            err,
            BtError::AlreadySpawned {
                position: Position::root()
            }
        );
    }

    #[test]
    fn ticking_or_interrupting_an_unspawned_node_is_rejected() {
        let mut exec = executor(TaskDescriptor::interrupter(TaskDescriptor::success()));
        let tree = Rc::clone(exec.tree());
        let node = exec.create_node(tree, None, Position::root()).unwrap();

        assert!(matches!(
            exec.tick_node(node),
            Err(BtError::NotSpawned { .. })
        ));
        assert!(matches!(
            exec.interrupt(node, Status::Success),
            Err(BtError::NotSpawned { .. })
        ));
    }

    #[test]
    fn ticking_a_finished_node_is_rejected() {
        let mut exec = executor(TaskDescriptor::success());
        exec.tick().unwrap();
        assert_eq!(exec.tick().unwrap(), Status::Success);

        let root = exec.root().unwrap();
        assert_eq!(
            exec.tick_node(root),
            Err(BtError::NotTickable {
                position: Position::root(),
                status: Status::Success
            })
        );
    }

    #[test]
    fn schedule_applies_insertions_before_removals() {
        let mut schedule = Schedule::default();
        let a = NodeId(1);
        let b = NodeId(2);

        schedule.request_insertion(a);
        schedule.request_insertion(a);
        schedule.request_insertion(b);
        schedule.request_removal(b);
        schedule.apply();
        assert_eq!(schedule.live, vec![a]);

        schedule.request_removal(a);
        schedule.cancel_removal(a);
        schedule.apply();
        assert_eq!(schedule.live, vec![a]);
    }

    #[test]
    fn released_nodes_leave_no_slots_behind() {
        let mut exec = executor(TaskDescriptor::repeat(TaskDescriptor::sequence([
            TaskDescriptor::success(),
            TaskDescriptor::success(),
        ])));
        for _ in 0..20 {
            exec.tick().unwrap();
        }
        // Repeat, its current sequence and at most one live leaf.
        assert!(exec.nodes.len() <= 3, "nodes = {}", exec.nodes.len());
        assert_eq!(exec.status(), Status::Running);
    }
}

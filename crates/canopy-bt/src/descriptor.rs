use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use canopy_core::{Position, Status};

use crate::context::Context;
use crate::leaf::{Condition, LeafTask};

static NEXT_DESCRIPTOR: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`TaskDescriptor`].
///
/// Interrupters are registered and looked up by this id, so a perform-interruption leaf can
/// name its targets before the tree is ever run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorId(u64);

impl DescriptorId {
    fn next() -> Self {
        Self(NEXT_DESCRIPTOR.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Builds a fresh leaf runtime each time the leaf is spawned.
pub type LeafFactory = Rc<dyn Fn() -> Box<dyn LeafTask>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelPolicy {
    /// Fails as soon as one child fails; succeeds once every child succeeded.
    Sequence,
    /// Succeeds as soon as one child succeeds; fails once every child failed.
    Selector,
}

#[derive(Clone)]
pub enum TaskKind {
    Sequence,
    Selector,
    RandomSequence,
    RandomSelector,
    Parallel(ParallelPolicy),
    StaticPriorityList,
    DynamicPriorityList,
    Interrupter {
        /// Side-effect tree run when the interrupter is forced to finish.
        branch: Option<Rc<TaskDescriptor>>,
        /// Ticks granted to `branch` after its spawning tick.
        branch_ticks: u32,
    },
    Limit {
        max_runs: u32,
    },
    Repeat,
    UntilFail,
    Inverter,
    Succeeder,
    HierarchicalContext,
    SafeContext,
    SafeOutputContext {
        outputs: Vec<String>,
    },
    PerformInterruption {
        targets: Vec<DescriptorId>,
        desired: Status,
    },
    SubtreeLookup {
        tree: String,
    },
    Success,
    Failure,
    Wait {
        ticks: u32,
    },
    VariableRenamer {
        from: String,
        to: String,
    },
    Action(LeafFactory),
    Condition(LeafFactory),
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Sequence => "sequence",
            TaskKind::Selector => "selector",
            TaskKind::RandomSequence => "random_sequence",
            TaskKind::RandomSelector => "random_selector",
            TaskKind::Parallel(_) => "parallel",
            TaskKind::StaticPriorityList => "static_priority_list",
            TaskKind::DynamicPriorityList => "dynamic_priority_list",
            TaskKind::Interrupter { .. } => "interrupter",
            TaskKind::Limit { .. } => "limit",
            TaskKind::Repeat => "repeat",
            TaskKind::UntilFail => "until_fail",
            TaskKind::Inverter => "inverter",
            TaskKind::Succeeder => "succeeder",
            TaskKind::HierarchicalContext => "hierarchical_context",
            TaskKind::SafeContext => "safe_context",
            TaskKind::SafeOutputContext { .. } => "safe_output_context",
            TaskKind::PerformInterruption { .. } => "perform_interruption",
            TaskKind::SubtreeLookup { .. } => "subtree_lookup",
            TaskKind::Success => "success",
            TaskKind::Failure => "failure",
            TaskKind::Wait { .. } => "wait",
            TaskKind::VariableRenamer { .. } => "variable_renamer",
            TaskKind::Action(_) => "action",
            TaskKind::Condition(_) => "condition",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            TaskKind::PerformInterruption { .. }
                | TaskKind::SubtreeLookup { .. }
                | TaskKind::Success
                | TaskKind::Failure
                | TaskKind::Wait { .. }
                | TaskKind::VariableRenamer { .. }
                | TaskKind::Action(_)
                | TaskKind::Condition(_)
        )
    }
}

impl fmt::Debug for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable description of one node of a behavior tree.
///
/// Descriptors are assembled bottom-up with the constructors below and sealed with
/// [`into_tree`](Self::into_tree), which assigns every node its [`Position`]. Positions are
/// written once and never change afterwards.
#[derive(Debug)]
pub struct TaskDescriptor {
    id: DescriptorId,
    kind: TaskKind,
    name: Option<String>,
    guard: Option<Rc<TaskDescriptor>>,
    children: Vec<Rc<TaskDescriptor>>,
    always_fail: bool,
    position: OnceCell<Position>,
}

impl TaskDescriptor {
    pub fn new(kind: TaskKind, children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self {
            id: DescriptorId::next(),
            kind,
            name: None,
            guard: None,
            children: children.into_iter().map(Rc::new).collect(),
            always_fail: false,
            position: OnceCell::new(),
        }
    }

    fn leaf(kind: TaskKind) -> Self {
        Self::new(kind, [])
    }

    pub fn sequence(children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self::new(TaskKind::Sequence, children)
    }

    pub fn selector(children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self::new(TaskKind::Selector, children)
    }

    pub fn random_sequence(children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self::new(TaskKind::RandomSequence, children)
    }

    pub fn random_selector(children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self::new(TaskKind::RandomSelector, children)
    }

    pub fn parallel(
        policy: ParallelPolicy,
        children: impl IntoIterator<Item = TaskDescriptor>,
    ) -> Self {
        Self::new(TaskKind::Parallel(policy), children)
    }

    pub fn static_priority_list(children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self::new(TaskKind::StaticPriorityList, children)
    }

    pub fn dynamic_priority_list(children: impl IntoIterator<Item = TaskDescriptor>) -> Self {
        Self::new(TaskKind::DynamicPriorityList, children)
    }

    pub fn interrupter(child: TaskDescriptor) -> Self {
        Self::new(
            TaskKind::Interrupter {
                branch: None,
                branch_ticks: 0,
            },
            [child],
        )
    }

    /// Interrupter that runs `branch` for up to `branch_ticks` ticks whenever it is interrupted.
    pub fn interrupter_with_branch(
        child: TaskDescriptor,
        branch: TaskDescriptor,
        branch_ticks: u32,
    ) -> Self {
        Self::new(
            TaskKind::Interrupter {
                branch: Some(branch.into_tree()),
                branch_ticks,
            },
            [child],
        )
    }

    pub fn limit(max_runs: u32, child: TaskDescriptor) -> Self {
        Self::new(TaskKind::Limit { max_runs }, [child])
    }

    pub fn repeat(child: TaskDescriptor) -> Self {
        Self::new(TaskKind::Repeat, [child])
    }

    pub fn until_fail(child: TaskDescriptor) -> Self {
        Self::new(TaskKind::UntilFail, [child])
    }

    pub fn inverter(child: TaskDescriptor) -> Self {
        Self::new(TaskKind::Inverter, [child])
    }

    pub fn succeeder(child: TaskDescriptor) -> Self {
        Self::new(TaskKind::Succeeder, [child])
    }

    pub fn hierarchical_context(child: TaskDescriptor) -> Self {
        Self::new(TaskKind::HierarchicalContext, [child])
    }

    pub fn safe_context(child: TaskDescriptor) -> Self {
        Self::new(TaskKind::SafeContext, [child])
    }

    pub fn safe_output_context<S: Into<String>>(
        outputs: impl IntoIterator<Item = S>,
        child: TaskDescriptor,
    ) -> Self {
        Self::new(
            TaskKind::SafeOutputContext {
                outputs: outputs.into_iter().map(Into::into).collect(),
            },
            [child],
        )
    }

    pub fn perform_interruption(
        targets: impl IntoIterator<Item = DescriptorId>,
        desired: Status,
    ) -> Self {
        Self::leaf(TaskKind::PerformInterruption {
            targets: targets.into_iter().collect(),
            desired,
        })
    }

    pub fn subtree_lookup(tree: impl Into<String>) -> Self {
        Self::leaf(TaskKind::SubtreeLookup { tree: tree.into() })
    }

    pub fn success() -> Self {
        Self::leaf(TaskKind::Success)
    }

    pub fn failure() -> Self {
        Self::leaf(TaskKind::Failure)
    }

    pub fn wait(ticks: u32) -> Self {
        Self::leaf(TaskKind::Wait { ticks })
    }

    pub fn rename_variable(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::leaf(TaskKind::VariableRenamer {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn action<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn LeafTask> + 'static,
    {
        Self::leaf(TaskKind::Action(Rc::new(factory)))
    }

    pub fn condition<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn LeafTask> + 'static,
    {
        Self::leaf(TaskKind::Condition(Rc::new(factory)))
    }

    /// Condition leaf backed by a predicate over the context it runs under.
    pub fn condition_fn<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Context) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        Self::condition(move || {
            let predicate = Rc::clone(&predicate);
            Box::new(Condition::new(move |ctx: &dyn Context| predicate(ctx))) as Box<dyn LeafTask>
        })
    }

    pub fn with_guard(mut self, guard: TaskDescriptor) -> Self {
        self.guard = Some(guard.into_tree());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Forces every `Success` this node reports to surface as `Failure`.
    pub fn always_fail(mut self) -> Self {
        self.always_fail = true;
        self
    }

    /// Seals the descriptor as the root of a tree and assigns positions.
    pub fn into_tree(self) -> Rc<TaskDescriptor> {
        let tree = Rc::new(self);
        tree.compute_positions();
        tree
    }

    /// Assigns positions to this node and its descendants with a pre-order walk, taking this
    /// node as the root. A tree whose root already has a position is left untouched.
    pub fn compute_positions(&self) {
        if self.position.get().is_some() {
            return;
        }
        self.assign(Position::root());
    }

    fn assign(&self, position: Position) {
        for (i, child) in self.children.iter().enumerate() {
            child.assign(position.child(i));
        }
        let _ = self.position.set(position);
    }

    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn guard(&self) -> Option<&Rc<TaskDescriptor>> {
        self.guard.as_ref()
    }

    pub fn children(&self) -> &[Rc<TaskDescriptor>] {
        &self.children
    }

    pub fn always_fails(&self) -> bool {
        self.always_fail
    }

    /// Position inside the tree this descriptor was sealed into; the root position before that.
    pub fn position(&self) -> Position {
        self.position.get().cloned().unwrap_or_default()
    }

    /// Follows `position` from this node down through its children.
    pub fn find(&self, position: &Position) -> Option<&TaskDescriptor> {
        let mut node = self;
        for &m in position.moves() {
            node = node.children.get(m)?;
        }
        Some(node)
    }
}

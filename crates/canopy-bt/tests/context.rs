mod common;

use std::rc::Rc;

use canopy_bt::{
    BasicContext, Context, ContextRef, Executor, HierarchicalContext, SafeContext,
    SafeOutputContext, Status, TaskDescriptor, TreeLibrary, Value,
};
use common::{flag, run, set_var};

fn basic() -> Rc<BasicContext> {
    Rc::new(BasicContext::new())
}

#[test]
fn basic_context_set_reports_previous_definition() {
    let ctx = BasicContext::new();
    assert!(!ctx.set("hp", Value::Int(3)));
    assert!(ctx.set("hp", Value::Int(2)));
    assert_eq!(ctx.get("hp"), Some(Value::Int(2)));
    assert!(ctx.clear_one("hp"));
    assert!(!ctx.clear_one("hp"));
    assert!(ctx.is_empty());
}

#[test]
fn hierarchical_context_reads_through_and_writes_locally() {
    let parent = basic();
    parent.set("hp", Value::Int(3));
    let child = HierarchicalContext::new(Rc::clone(&parent) as ContextRef);
    assert!(child.parent().is_some());

    assert_eq!(child.get("hp"), Some(Value::Int(3)));
    child.set("hp", Value::Int(1));
    assert_eq!(child.get("hp"), Some(Value::Int(1)));
    assert_eq!(parent.get("hp"), Some(Value::Int(3)));

    child.clear();
    assert_eq!(child.get("hp"), Some(Value::Int(3)));
    let detached = HierarchicalContext::detached();
    assert!(detached.parent().is_none());
    assert!(detached.get("hp").is_none());
}

#[test]
fn safe_context_hides_writes_and_clears_from_input() {
    let input = basic();
    input.set("target", Value::from("door"));
    let safe = SafeContext::new(Rc::clone(&input) as ContextRef);

    assert!(safe.set("target", Value::from("window")));
    assert_eq!(safe.get("target"), Some(Value::from("window")));
    assert_eq!(input.get("target"), Some(Value::from("door")));

    assert!(safe.clear_one("target"));
    assert_eq!(safe.get("target"), None);
    assert_eq!(input.get("target"), Some(Value::from("door")));

    safe.clear();
    assert!(!safe.set("target", Value::Int(1)));
}

#[test]
fn safe_output_context_passes_outputs_through() {
    let input = basic();
    input.set("scratch", Value::Int(0));
    let scoped = SafeOutputContext::new(Rc::clone(&input) as ContextRef, ["result"]);

    scoped.set("scratch", Value::Int(9));
    scoped.set("result", Value::Int(42));
    assert_eq!(input.get("scratch"), Some(Value::Int(0)));
    assert_eq!(input.get("result"), Some(Value::Int(42)));
    assert!(scoped.is_output("result"));

    scoped.clear();
    assert_eq!(input.get("result"), None);
    assert_eq!(input.get("scratch"), Some(Value::Int(0)));
}

#[test]
fn tree_library_overwrites_by_name() {
    let mut library = TreeLibrary::new();
    assert!(!library.add_tree("patrol", TaskDescriptor::success().into_tree()));
    assert!(library.add_tree("patrol", TaskDescriptor::failure().into_tree()));
    assert_eq!(library.len(), 1);
    assert!(library.contains("patrol"));
    assert_eq!(library.names().collect::<Vec<_>>(), ["patrol"]);
}

#[test]
fn safe_context_task_isolates_its_subtree() {
    let root = basic();
    let tree = TaskDescriptor::safe_context(TaskDescriptor::sequence([
        set_var("armed", true),
        flag("armed"),
    ]))
    .into_tree();
    let mut exec = Executor::new(tree, Rc::clone(&root) as ContextRef);

    assert_eq!(run(&mut exec, 10), Status::Success);
    assert_eq!(root.get("armed"), None);
}

#[test]
fn safe_output_context_task_publishes_only_outputs() {
    let root = basic();
    let tree = TaskDescriptor::safe_output_context(
        ["y"],
        TaskDescriptor::sequence([set_var("x", 1), set_var("y", 2)]),
    )
    .into_tree();
    let mut exec = Executor::new(tree, Rc::clone(&root) as ContextRef);

    assert_eq!(run(&mut exec, 10), Status::Success);
    assert_eq!(root.get("x"), None);
    assert_eq!(root.get("y"), Some(Value::Int(2)));
}

#[test]
fn hierarchical_context_task_shadows_parent_variables() {
    let root = basic();
    root.set("ready", Value::Bool(true));
    let tree = TaskDescriptor::hierarchical_context(TaskDescriptor::sequence([
        flag("ready"),
        set_var("ready", false),
    ]))
    .into_tree();
    let mut exec = Executor::new(tree, Rc::clone(&root) as ContextRef);

    assert_eq!(run(&mut exec, 10), Status::Success);
    assert_eq!(root.get("ready"), Some(Value::Bool(true)));
}

#[test]
fn subtree_lookup_runs_named_tree() {
    let mut library = TreeLibrary::new();
    library.add_tree(
        "patrol",
        TaskDescriptor::sequence([TaskDescriptor::success(), set_var("patrolled", true)])
            .into_tree(),
    );
    let root = Rc::new(BasicContext::with_library(library));
    let tree = TaskDescriptor::subtree_lookup("patrol").into_tree();
    let mut exec = Executor::new(tree, Rc::clone(&root) as ContextRef);

    assert_eq!(run(&mut exec, 10), Status::Success);
    assert_eq!(root.get("patrolled"), Some(Value::Bool(true)));
}

#[test]
fn subtree_lookup_fails_for_unknown_tree() {
    let tree = TaskDescriptor::subtree_lookup("nowhere").into_tree();
    let mut exec = Executor::with_basic_context(tree);

    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Failure);
}

#[test]
fn subtree_lookup_resolves_through_hierarchical_context() {
    let root = basic();
    root.add_tree("idle", TaskDescriptor::success().into_tree());
    let tree = TaskDescriptor::hierarchical_context(TaskDescriptor::subtree_lookup("idle"))
        .into_tree();
    let mut exec = Executor::new(tree, Rc::clone(&root) as ContextRef);

    assert_eq!(run(&mut exec, 10), Status::Success);
}

#[test]
fn rename_variable_moves_value() {
    let root = basic();
    root.set("a", Value::Int(5));
    root.set("b", Value::Int(0));
    let mut exec = Executor::new(
        TaskDescriptor::rename_variable("a", "b").into_tree(),
        Rc::clone(&root) as ContextRef,
    );

    assert_eq!(run(&mut exec, 5), Status::Success);
    assert_eq!(root.get("a"), None);
    assert_eq!(root.get("b"), Some(Value::Int(5)));

    // A missing source clears the target.
    let mut again = Executor::new(
        TaskDescriptor::rename_variable("a", "b").into_tree(),
        Rc::clone(&root) as ContextRef,
    );
    assert_eq!(run(&mut again, 5), Status::Success);
    assert_eq!(root.get("b"), None);
}

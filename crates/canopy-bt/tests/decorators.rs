mod common;

use std::cell::Cell;
use std::rc::Rc;

use canopy_bt::{
    BtResult, Executor, LeafHandle, LeafTask, Position, Status, TaskDescriptor, TaskStateStore,
    Value, RUNS_SO_FAR,
};
use common::{forever, run, scripted, Probe};

fn runs_so_far(store: &TaskStateStore, position: &Position) -> Option<Value> {
    store
        .get(position)
        .and_then(|state| state.get(RUNS_SO_FAR).cloned())
}

#[test]
fn limit_caps_runs_and_remembers_them_across_executors() {
    let probe = Probe::default();
    let store = TaskStateStore::new();
    let tree = TaskDescriptor::until_fail(TaskDescriptor::limit(
        2,
        scripted("run", &[Status::Success], &probe),
    ))
    .into_tree();
    let mut exec = Executor::with_basic_context(Rc::clone(&tree)).with_task_states(store.clone());

    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Success);
    assert_eq!(probe.count("spawn:run"), 2);

    let limit = Position::from_moves([0]);
    assert_eq!(runs_so_far(&store, &limit), Some(Value::Int(2)));

    // A fresh executor over the same store starts out exhausted.
    let mut rebuilt = Executor::with_basic_context(tree).with_task_states(store.clone());
    assert_eq!(rebuilt.tick().unwrap(), Status::Running);
    assert_eq!(rebuilt.tick().unwrap(), Status::Success);
    assert_eq!(probe.count("spawn:run"), 2);
}

#[test]
fn limit_stores_runs_when_terminated() {
    let probe = Probe::default();
    let store = TaskStateStore::new();
    let tree = TaskDescriptor::limit(5, forever("work", &probe)).into_tree();

    for expected in 1..=2 {
        let mut exec =
            Executor::with_basic_context(Rc::clone(&tree)).with_task_states(store.clone());
        exec.tick().unwrap();
        exec.terminate().unwrap();
        assert_eq!(runs_so_far(&store, &Position::root()), Some(Value::Int(expected)));
    }
    assert_eq!(probe.count("spawn:work"), 2);
}

#[test]
fn repeat_respawns_child_forever() {
    let probe = Probe::default();
    let tree = TaskDescriptor::repeat(scripted("beat", &[Status::Success], &probe)).into_tree();
    let mut exec = Executor::with_basic_context(tree);

    for _ in 0..5 {
        assert_eq!(exec.tick().unwrap(), Status::Running);
    }
    assert_eq!(probe.count("spawn:beat"), 5);
}

/// Succeeds while the shared budget lasts, then fails.
struct Countdown {
    remaining: Rc<Cell<u32>>,
}

impl LeafTask for Countdown {
    fn spawn(&mut self, leaf: &mut LeafHandle<'_>) -> BtResult<()> {
        leaf.request_tick();
        Ok(())
    }

    fn tick(&mut self, _leaf: &mut LeafHandle<'_>) -> Status {
        match self.remaining.get() {
            0 => Status::Failure,
            n => {
                self.remaining.set(n - 1);
                Status::Success
            }
        }
    }
}

#[test]
fn until_fail_succeeds_when_child_fails() {
    let remaining = Rc::new(Cell::new(2));
    let budget = Rc::clone(&remaining);
    let tree = TaskDescriptor::until_fail(TaskDescriptor::action(move || {
        Box::new(Countdown {
            remaining: Rc::clone(&budget),
        }) as Box<dyn LeafTask>
    }))
    .into_tree();
    let mut exec = Executor::with_basic_context(tree);

    assert_eq!(run(&mut exec, 10), Status::Success);
    assert_eq!(exec.cycle(), 4);
    assert_eq!(remaining.get(), 0);
}

#[test]
fn inverter_swaps_outcomes() {
    let cases = [
        (TaskDescriptor::success(), Status::Failure),
        (TaskDescriptor::failure(), Status::Success),
    ];
    for (child, expected) in cases {
        let mut exec = Executor::with_basic_context(TaskDescriptor::inverter(child).into_tree());
        assert_eq!(run(&mut exec, 5), expected);
    }
}

#[test]
fn inverter_passes_running_through() {
    let probe = Probe::default();
    let tree = TaskDescriptor::inverter(forever("work", &probe)).into_tree();
    let mut exec = Executor::with_basic_context(tree);

    for _ in 0..3 {
        assert_eq!(exec.tick().unwrap(), Status::Running);
    }
}

#[test]
fn succeeder_turns_failure_into_success() {
    let tree = TaskDescriptor::succeeder(TaskDescriptor::failure()).into_tree();
    let mut exec = Executor::with_basic_context(tree);
    assert_eq!(run(&mut exec, 5), Status::Success);
}

#[test]
fn always_fail_overrides_success() {
    let tree = TaskDescriptor::sequence([TaskDescriptor::success()])
        .always_fail()
        .into_tree();
    let mut exec = Executor::with_basic_context(tree);
    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Failure);
}

#[test]
fn always_fail_child_stops_a_sequence() {
    let probe = Probe::default();
    let tree = TaskDescriptor::sequence([
        TaskDescriptor::success().always_fail(),
        scripted("after", &[Status::Success], &probe),
    ])
    .into_tree();
    let mut exec = Executor::with_basic_context(tree);

    assert_eq!(run(&mut exec, 5), Status::Failure);
    assert_eq!(probe.count("spawn:after"), 0);
}

#[test]
fn wait_succeeds_after_its_tick_count() {
    let mut exec = Executor::with_basic_context(TaskDescriptor::wait(3).into_tree());
    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.tick().unwrap(), Status::Success);
}

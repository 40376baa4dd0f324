mod common;

use std::cell::RefCell;
use std::rc::Rc;

use canopy_bt::{Executor, Position, Status, TaskDescriptor};
use canopy_tools::VecTraceSink;
use common::{run, scripted, Probe};

#[test]
fn executor_reports_lifecycle_events() {
    let probe = Probe::default();
    let sink = Rc::new(RefCell::new(VecTraceSink::default()));
    let tree = TaskDescriptor::sequence([
        scripted("a", &[Status::Success], &probe),
        scripted("b", &[Status::Success], &probe),
    ])
    .into_tree();
    let mut exec = Executor::with_basic_context(tree).with_trace_sink(sink.clone());

    assert_eq!(run(&mut exec, 10), Status::Success);

    let sink = sink.borrow();
    assert_eq!(sink.count("bt.spawn"), 3);
    assert_eq!(sink.count("bt.tick"), 4);
    assert_eq!(sink.count("bt.terminate"), 0);

    let first_tick = sink.events.iter().find(|e| e.tag == "bt.tick").unwrap();
    assert_eq!(first_tick.cycle, 2);
    assert_eq!(first_tick.position, Position::from_moves([0]));
}

#[test]
fn guard_executors_share_the_sink() {
    let probe = Probe::default();
    let sink = Rc::new(RefCell::new(VecTraceSink::default()));
    let guard = TaskDescriptor::condition_fn(|_| true);
    let guard_id = guard.id().get();
    let tree = TaskDescriptor::static_priority_list([
        scripted("child", &[Status::Success], &probe).with_guard(guard)
    ])
    .into_tree();
    let mut exec = Executor::with_basic_context(tree).with_trace_sink(sink.clone());

    assert_eq!(run(&mut exec, 10), Status::Success);
    assert!(sink
        .borrow()
        .events
        .iter()
        .any(|e| e.descriptor == guard_id && e.tag == "bt.tick"));
}

#[test]
fn interrupts_and_terminations_are_reported() {
    let probe = Probe::default();
    let sink = Rc::new(RefCell::new(VecTraceSink::default()));
    let guarded = TaskDescriptor::interrupter(scripted("work", &[Status::Running], &probe));
    let id = guarded.id();
    let mut exec = Executor::with_basic_context(guarded.into_tree()).with_trace_sink(sink.clone());

    exec.tick().unwrap();
    let node = exec.find_interrupter(id).unwrap();
    exec.interrupt(node, Status::Failure).unwrap();

    let sink = sink.borrow();
    assert_eq!(sink.count("bt.interrupt"), 1);
    assert_eq!(sink.count("bt.terminate"), 1);
}

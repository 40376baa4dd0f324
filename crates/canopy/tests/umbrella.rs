#![cfg(feature = "full")]

use std::cell::RefCell;
use std::rc::Rc;

use canopy::bt::{Executor, Status, TaskDescriptor};
use canopy::tools::TraceLog;

#[test]
fn reexports_drive_a_tree_end_to_end() {
    let log = Rc::new(RefCell::new(TraceLog::default()));
    let tree = TaskDescriptor::sequence([TaskDescriptor::success(), TaskDescriptor::wait(2)])
        .into_tree();
    let mut exec = Executor::with_basic_context(tree).with_trace_sink(log.clone());

    let mut status = Status::Uninitialized;
    for _ in 0..10 {
        status = exec.tick().unwrap();
        if status.is_finished() {
            break;
        }
    }
    assert_eq!(status, Status::Success);
    assert!(!log.borrow().events.is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn trace_log_serializes_through_the_umbrella() {
    let log = Rc::new(RefCell::new(TraceLog::default()));
    let mut exec = Executor::with_basic_context(TaskDescriptor::success().into_tree())
        .with_trace_sink(log.clone());
    exec.tick().unwrap();
    exec.tick().unwrap();

    let json = serde_json::to_string(&*log.borrow()).unwrap();
    let back: TraceLog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, *log.borrow());
}

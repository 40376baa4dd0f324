mod common;

use canopy_bt::{Executor, NodeList, Status, TaskDescriptor};
use common::{forever, Probe};

#[test]
fn list_requests_apply_on_next_tick_unless_cancelled() {
    let probe = Probe::default();
    let tree = TaskDescriptor::sequence([forever("work", &probe)]).into_tree();
    let mut exec = Executor::with_basic_context(tree);
    exec.tick().unwrap();

    let root = exec.root().unwrap();
    assert_eq!(exec.node_descriptor(root).unwrap().kind().name(), "sequence");
    assert_eq!(exec.tickable_len(), 1);
    assert!(!exec.tickable().contains(&root));
    assert_eq!(exec.open_len(), 0);

    exec.request_insertion(NodeList::Open, root);
    exec.request_insertion(NodeList::Tickable, root);
    exec.cancel_insertion_request(NodeList::Tickable, root);
    assert_eq!(exec.open_len(), 0);

    assert_eq!(exec.tick().unwrap(), Status::Running);
    assert_eq!(exec.open_len(), 1);
    assert_eq!(exec.tickable_len(), 1);
    assert!(!exec.tickable().contains(&root));

    exec.request_removal(NodeList::Open, root);
    exec.cancel_removal_request(NodeList::Open, root);
    exec.tick().unwrap();
    assert_eq!(exec.open_len(), 1);

    let work = exec.tickable()[0];
    exec.request_removal(NodeList::Open, root);
    exec.request_removal(NodeList::Tickable, work);
    exec.tick().unwrap();
    assert_eq!(exec.open_len(), 0);
    assert_eq!(exec.tickable_len(), 0);
    assert_eq!(probe.count("tick:work"), 2);
}

#[test]
fn terminated_nodes_leave_the_open_list() {
    let probe = Probe::default();
    let mut exec = Executor::with_basic_context(forever("work", &probe).into_tree());
    exec.tick().unwrap();
    let root = exec.root().unwrap();

    exec.request_insertion(NodeList::Open, root);
    exec.tick().unwrap();
    assert_eq!(exec.open_len(), 1);

    exec.terminate().unwrap();
    assert_eq!(exec.open_len(), 0);
    assert_eq!(exec.tickable_len(), 0);
}

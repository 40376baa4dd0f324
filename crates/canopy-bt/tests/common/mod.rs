#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use canopy_bt::{BtResult, Context, Executor, LeafHandle, LeafTask, Status, TaskDescriptor, Value};

/// Shared log of leaf lifecycle events, e.g. `"spawn:a"`, `"tick:a"`, `"terminate:a"`.
#[derive(Clone, Default)]
pub struct Probe(Rc<RefCell<Vec<String>>>);

impl Probe {
    pub fn record(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == event).count()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| e.strip_prefix("spawn:").map(str::to_owned))
            .collect()
    }
}

/// Leaf replaying one status per tick; the last status repeats.
struct Scripted {
    label: &'static str,
    script: Rc<[Status]>,
    step: usize,
    probe: Probe,
}

impl LeafTask for Scripted {
    fn spawn(&mut self, leaf: &mut LeafHandle<'_>) -> BtResult<()> {
        self.probe.record(format!("spawn:{}", self.label));
        leaf.request_tick();
        Ok(())
    }

    fn tick(&mut self, _leaf: &mut LeafHandle<'_>) -> Status {
        self.probe.record(format!("tick:{}", self.label));
        let status = self.script[self.step.min(self.script.len() - 1)];
        self.step += 1;
        status
    }

    fn terminate(&mut self, _leaf: &mut LeafHandle<'_>) -> BtResult<()> {
        self.probe.record(format!("terminate:{}", self.label));
        Ok(())
    }
}

pub fn scripted(label: &'static str, script: &[Status], probe: &Probe) -> TaskDescriptor {
    let script: Rc<[Status]> = script.into();
    let probe = probe.clone();
    TaskDescriptor::action(move || {
        Box::new(Scripted {
            label,
            script: Rc::clone(&script),
            step: 0,
            probe: probe.clone(),
        }) as Box<dyn LeafTask>
    })
    .named(label)
}

/// Leaf that keeps running until something terminates it.
pub fn forever(label: &'static str, probe: &Probe) -> TaskDescriptor {
    scripted(label, &[Status::Running], probe)
}

/// Leaf that writes a context variable when spawned and succeeds on its first tick.
struct SetVar {
    name: &'static str,
    value: Value,
}

impl LeafTask for SetVar {
    fn spawn(&mut self, leaf: &mut LeafHandle<'_>) -> BtResult<()> {
        leaf.context().set(self.name, self.value.clone());
        leaf.request_tick();
        Ok(())
    }

    fn tick(&mut self, _leaf: &mut LeafHandle<'_>) -> Status {
        Status::Success
    }
}

pub fn set_var(name: &'static str, value: impl Into<Value>) -> TaskDescriptor {
    let value = value.into();
    TaskDescriptor::action(move || {
        Box::new(SetVar {
            name,
            value: value.clone(),
        }) as Box<dyn LeafTask>
    })
}

/// Condition leaf that succeeds while `name` holds `true`.
pub fn flag(name: &'static str) -> TaskDescriptor {
    TaskDescriptor::condition_fn(move |ctx: &dyn Context| {
        ctx.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
    })
}

/// Ticks until the tree finishes or `max_ticks` is reached.
pub fn run(exec: &mut Executor, max_ticks: usize) -> Status {
    for _ in 0..max_ticks {
        let status = exec.tick().expect("tick");
        if status.is_finished() {
            return status;
        }
    }
    exec.status()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

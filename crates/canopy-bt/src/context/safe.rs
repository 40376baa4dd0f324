use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use canopy_core::Value;

use super::{BasicContext, Context, ContextRef};
use crate::descriptor::TaskDescriptor;

/// Copy-on-write view over an input context.
///
/// A name is read from the input until it is written or cleared here; from then on it lives in
/// the private overlay. After a full `clear` every read is served by the overlay.
struct Overlay {
    input: ContextRef,
    local: BasicContext,
    touched: RefCell<BTreeSet<String>>,
    cleared: Cell<bool>,
}

impl Overlay {
    fn new(input: ContextRef) -> Self {
        Self {
            input,
            local: BasicContext::new(),
            touched: RefCell::default(),
            cleared: Cell::new(false),
        }
    }

    fn owns(&self, name: &str) -> bool {
        self.cleared.get() || self.touched.borrow().contains(name)
    }

    fn touch(&self, name: &str) {
        self.touched.borrow_mut().insert(name.to_owned());
    }

    fn get(&self, name: &str) -> Option<Value> {
        if self.owns(name) {
            self.local.get(name)
        } else {
            self.input.get(name)
        }
    }

    fn set(&self, name: &str, value: Value) -> bool {
        let existed = self.get(name).is_some();
        self.touch(name);
        self.local.set(name, value);
        existed
    }

    fn clear_one(&self, name: &str) -> bool {
        let existed = self.get(name).is_some();
        self.touch(name);
        self.local.clear_one(name);
        existed
    }

    fn clear(&self) {
        self.local.clear();
        self.cleared.set(true);
    }
}

/// Read-through, write-isolated view: the input context is never modified.
pub struct SafeContext {
    overlay: Overlay,
}

impl SafeContext {
    pub fn new(input: ContextRef) -> Self {
        Self {
            overlay: Overlay::new(input),
        }
    }
}

impl Context for SafeContext {
    fn get(&self, name: &str) -> Option<Value> {
        self.overlay.get(name)
    }

    fn set(&self, name: &str, value: Value) -> bool {
        self.overlay.set(name, value)
    }

    fn clear(&self) {
        self.overlay.clear();
    }

    fn clear_one(&self, name: &str) -> bool {
        self.overlay.clear_one(name)
    }

    fn lookup_tree(&self, name: &str) -> Option<Rc<TaskDescriptor>> {
        self.overlay.input.lookup_tree(name)
    }
}

/// Like [`SafeContext`], except that the named output variables read from and write to the
/// input context directly.
pub struct SafeOutputContext {
    overlay: Overlay,
    outputs: BTreeSet<String>,
}

impl SafeOutputContext {
    pub fn new<S: Into<String>>(input: ContextRef, outputs: impl IntoIterator<Item = S>) -> Self {
        Self {
            overlay: Overlay::new(input),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_output(&self, name: &str) -> bool {
        self.outputs.contains(name)
    }
}

impl Context for SafeOutputContext {
    fn get(&self, name: &str) -> Option<Value> {
        if self.is_output(name) {
            self.overlay.input.get(name)
        } else {
            self.overlay.get(name)
        }
    }

    fn set(&self, name: &str, value: Value) -> bool {
        if self.is_output(name) {
            self.overlay.input.set(name, value)
        } else {
            self.overlay.set(name, value)
        }
    }

    /// Drops the private overlay and the output variables held by the input context.
    fn clear(&self) {
        self.overlay.clear();
        for name in &self.outputs {
            self.overlay.input.clear_one(name);
        }
    }

    fn clear_one(&self, name: &str) -> bool {
        if self.is_output(name) {
            self.overlay.input.clear_one(name)
        } else {
            self.overlay.clear_one(name)
        }
    }

    fn lookup_tree(&self, name: &str) -> Option<Rc<TaskDescriptor>> {
        self.overlay.input.lookup_tree(name)
    }
}

use std::rc::Rc;

use canopy_core::Value;

use super::{BasicContext, Context, ContextRef};
use crate::descriptor::TaskDescriptor;

/// Local store that falls back to a parent for names (and trees) it does not hold.
///
/// Writes always land locally, so a parent value can be shadowed but never overwritten.
pub struct HierarchicalContext {
    local: BasicContext,
    parent: Option<ContextRef>,
}

impl HierarchicalContext {
    pub fn new(parent: ContextRef) -> Self {
        Self {
            local: BasicContext::new(),
            parent: Some(parent),
        }
    }

    pub fn detached() -> Self {
        Self {
            local: BasicContext::new(),
            parent: None,
        }
    }

    pub fn parent(&self) -> Option<&ContextRef> {
        self.parent.as_ref()
    }

    pub fn add_tree(&self, name: impl Into<String>, tree: Rc<TaskDescriptor>) -> bool {
        self.local.add_tree(name, tree)
    }
}

impl Context for HierarchicalContext {
    fn get(&self, name: &str) -> Option<Value> {
        self.local
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get(name)))
    }

    fn set(&self, name: &str, value: Value) -> bool {
        self.local.set(name, value)
    }

    fn clear(&self) {
        self.local.clear();
    }

    fn clear_one(&self, name: &str) -> bool {
        self.local.clear_one(name)
    }

    fn lookup_tree(&self, name: &str) -> Option<Rc<TaskDescriptor>> {
        self.local
            .lookup_tree(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup_tree(name)))
    }
}

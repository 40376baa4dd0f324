use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use canopy_core::Value;

use super::{Context, TreeLibrary};
use crate::descriptor::TaskDescriptor;

/// Plain variable store with its own tree library.
#[derive(Debug, Default)]
pub struct BasicContext {
    variables: RefCell<BTreeMap<String, Value>>,
    library: RefCell<TreeLibrary>,
}

impl BasicContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(library: TreeLibrary) -> Self {
        Self {
            variables: RefCell::default(),
            library: RefCell::new(library),
        }
    }

    /// Returns `true` if a tree with the same name was replaced.
    pub fn add_tree(&self, name: impl Into<String>, tree: Rc<TaskDescriptor>) -> bool {
        self.library.borrow_mut().add_tree(name, tree)
    }

    pub fn add_library(&self, library: &TreeLibrary) -> bool {
        self.library.borrow_mut().add_library(library)
    }

    pub fn len(&self) -> usize {
        self.variables.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.borrow().is_empty()
    }
}

impl Context for BasicContext {
    fn get(&self, name: &str) -> Option<Value> {
        self.variables.borrow().get(name).cloned()
    }

    fn set(&self, name: &str, value: Value) -> bool {
        self.variables
            .borrow_mut()
            .insert(name.to_owned(), value)
            .is_some()
    }

    fn clear(&self) {
        self.variables.borrow_mut().clear();
    }

    fn clear_one(&self, name: &str) -> bool {
        self.variables.borrow_mut().remove(name).is_some()
    }

    fn lookup_tree(&self, name: &str) -> Option<Rc<TaskDescriptor>> {
        self.library.borrow().get(name)
    }
}

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::descriptor::TaskDescriptor;

/// Named trees available to subtree lookups.
#[derive(Debug, Clone, Default)]
pub struct TreeLibrary {
    trees: BTreeMap<String, Rc<TaskDescriptor>>,
}

impl TreeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a tree with the same name was replaced.
    pub fn add_tree(&mut self, name: impl Into<String>, tree: Rc<TaskDescriptor>) -> bool {
        self.trees.insert(name.into(), tree).is_some()
    }

    /// Copies every tree of `other` into this library. Returns `true` if any name was replaced.
    pub fn add_library(&mut self, other: &TreeLibrary) -> bool {
        let mut replaced = false;
        for (name, tree) in &other.trees {
            replaced |= self.add_tree(name.clone(), Rc::clone(tree));
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<Rc<TaskDescriptor>> {
        self.trees.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }
}

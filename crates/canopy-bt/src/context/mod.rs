//! Variable stores a tree runs against.
//!
//! Every variant exposes the same contract: reads of a missing name return `None`, writes report
//! whether the name was visible before, and named trees are resolved through `lookup_tree`.

mod basic;
mod hierarchical;
mod library;
mod safe;

use std::rc::Rc;

use canopy_core::Value;

use crate::descriptor::TaskDescriptor;

pub use basic::BasicContext;
pub use hierarchical::HierarchicalContext;
pub use library::TreeLibrary;
pub use safe::{SafeContext, SafeOutputContext};

pub trait Context {
    fn get(&self, name: &str) -> Option<Value>;

    /// Returns `true` if `name` already had a value.
    fn set(&self, name: &str, value: Value) -> bool;

    fn clear(&self);

    /// Returns `true` if `name` had a value.
    fn clear_one(&self, name: &str) -> bool;

    fn lookup_tree(&self, name: &str) -> Option<Rc<TaskDescriptor>>;
}

/// Context handle shared between a runtime node, its children and nested executors.
pub type ContextRef = Rc<dyn Context>;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Position, Value};

/// Named variables a task persists across its re-spawns at one position.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskState {
    variables: BTreeMap<String, Value>,
}

impl TaskState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Returns `true` if the variable already existed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        self.variables.insert(name.into(), value.into()).is_some()
    }

    pub fn clear_one(&mut self, name: &str) -> bool {
        self.variables.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for TaskState
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Position-keyed task states, shareable between executors.
///
/// Cloning the store yields another handle to the same map; this is how an executor rebuilt for
/// the same tree picks up where a previous one left off.
#[derive(Debug, Clone, Default)]
pub struct TaskStateStore {
    states: Rc<RefCell<BTreeMap<Position, TaskState>>>,
}

impl TaskStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: &Position) -> Option<TaskState> {
        self.states.borrow().get(position).cloned()
    }

    /// Returns `true` if a state was already stored at `position`.
    pub fn set(&self, position: Position, state: TaskState) -> bool {
        self.states.borrow_mut().insert(position, state).is_some()
    }

    pub fn clear(&self, position: &Position) -> bool {
        self.states.borrow_mut().remove(position).is_some()
    }

    pub fn clear_all(&self) {
        self.states.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.borrow().is_empty()
    }

    /// `true` if both handles point at the same map.
    pub fn shares_with(&self, other: &TaskStateStore) -> bool {
        Rc::ptr_eq(&self.states, &other.states)
    }
}

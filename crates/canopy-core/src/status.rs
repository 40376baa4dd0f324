#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle status of a runtime task.
///
/// `Terminated` is reached only through an explicit termination and is treated as a failure
/// variant by every composite. Only `Running` permits further ticking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    #[default]
    Uninitialized,
    Running,
    Success,
    Failure,
    Terminated,
}

impl Status {
    /// `true` for `Success`, `Failure` and `Terminated`.
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Success | Status::Failure | Status::Terminated)
    }

    /// Statuses a task may legally report from a tick.
    pub fn is_tick_result(self) -> bool {
        matches!(self, Status::Running | Status::Success | Status::Failure)
    }

    /// Folds `Terminated` into `Failure`, leaving every other status untouched.
    pub fn settled(self) -> Status {
        match self {
            Status::Terminated => Status::Failure,
            other => other,
        }
    }
}

use canopy_core::{Position, Status};
use thiserror::Error;

use crate::executor::NodeId;

/// Misuse of the engine by a caller or by a task implementation.
///
/// None of these are retried; they surface from [`Executor::tick`](crate::Executor::tick) as
/// soon as they happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BtError {
    #[error("task at {position} returned illegal status {status:?}")]
    IllegalStatus { position: Position, status: Status },

    #[error("task at {position} has not been spawned")]
    NotSpawned { position: Position },

    #[error("task at {position} cannot be ticked while {status:?}")]
    NotTickable { position: Position, status: Status },

    #[error("task at {position} has already been spawned")]
    AlreadySpawned { position: Position },

    #[error("interrupt status must be Success or Failure, got {0:?}")]
    InvalidInterruptStatus(Status),

    #[error("task at {position} is not an interrupter")]
    NotAnInterrupter { position: Position },

    #[error("{kind} at {position} has no children")]
    EmptyComposite {
        kind: &'static str,
        position: Position,
    },

    #[error("unknown runtime node {0}")]
    UnknownNode(NodeId),
}

pub type BtResult<T> = std::result::Result<T, BtError>;

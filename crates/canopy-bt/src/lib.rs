//! Tick-driven behavior tree interpreter built on `canopy-core`.
//!
//! Build a tree with [`TaskDescriptor`], hand it to an [`Executor`] together with a
//! [`Context`], and call [`Executor::tick`] once per frame. Application leaves plug in through
//! [`LeafTask`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod leaf;
mod nodes;

pub use config::ExecutorConfig;
pub use context::{
    BasicContext, Context, ContextRef, HierarchicalContext, SafeContext, SafeOutputContext,
    TreeLibrary,
};
pub use descriptor::{DescriptorId, LeafFactory, ParallelPolicy, TaskDescriptor, TaskKind};
pub use error::{BtError, BtResult};
pub use executor::{Executor, NodeId, NodeList};
pub use leaf::{Condition, LeafHandle, LeafTask};
pub use nodes::RUNS_SO_FAR;

pub use canopy_core::{Position, Status, TaskState, TaskStateStore, Value};

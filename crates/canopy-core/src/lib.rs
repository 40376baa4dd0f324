//! Engine-agnostic primitives shared by the canopy behavior tree crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod position;
pub mod rng;
pub mod state;
pub mod status;
pub mod value;

pub use position::Position;
pub use rng::{DeterministicRng, SplitMix64};
pub use state::{TaskState, TaskStateStore};
pub use status::Status;
pub use value::Value;

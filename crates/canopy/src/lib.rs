//! Umbrella crate that re-exports the `canopy-*` building blocks.
//!
//! Most users only need the `bt` module: build a tree with [`bt::TaskDescriptor`] and drive it
//! with [`bt::Executor`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use canopy_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use canopy_tools as tools;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use canopy_bt as bt;

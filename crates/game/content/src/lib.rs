//! Data-driven battle content and loaders.
//!
//! This crate houses the static catalog a battle is drafted from:
//! - House passive bundles (data-driven via RON)
//! - Champion templates (data-driven via RON)
//! - Echo definitions (data-driven via RON)
//! - Battle tuning (data-driven via TOML)
//!
//! The catalog is consumed while building a roster and never appears in
//! battle state. Loaders convert the file formats into `waltz-core` types.

pub mod catalog;
pub mod roster;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{Catalog, CatalogIssue, MAX_ECHO_TAGS};
pub use roster::{DraftError, RosterBuilder};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, EchoSpec, LoadResult};

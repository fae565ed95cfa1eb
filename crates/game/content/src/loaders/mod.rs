//! Content loaders for reading battle data from files.
//!
//! This module converts RON/TOML files into `waltz-core` types. The bundled
//! data under `data/` is also embedded at compile time so tools can run
//! without a data directory.

pub mod catalog;
pub mod config;

pub use catalog::{CatalogLoader, EchoSpec};
pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

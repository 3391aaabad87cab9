//! Content loaders for reading game data from files.
//!
//! Maps and squeak catalogs are RON, engine configuration is TOML. Every
//! name in a data file is resolved against a [`Catalog`](crate::Catalog) or
//! the behavior tables in [`crate::catalog`].

pub mod config;
pub mod factory;
pub mod map;
pub mod rodents;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use rodents::RodentLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

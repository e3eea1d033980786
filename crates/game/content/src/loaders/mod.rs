//! Content loaders for reading game data from files.
//!
//! Every loader has a `load(path)` entry point for files on disk and a
//! `parse(text)` entry point for embedded or in-memory data.

pub mod actions;
pub mod classes;
pub mod config;
pub mod encounter;
pub mod factory;

pub use actions::{ActionCatalog, ActionLoader};
pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use encounter::{Encounter, EncounterLoader, SpawnSpec};
pub use factory::{Content, ContentFactory};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Embedded copies of the default data files.
pub mod embedded {
    pub const ACTIONS: &str = include_str!("../../data/actions.ron");
    pub const CLASSES: &str = include_str!("../../data/classes.ron");
    pub const CONFIG: &str = include_str!("../../data/config.toml");
    pub const BOSS_ARENA: &str = include_str!("../../data/encounters/boss_arena.ron");
}

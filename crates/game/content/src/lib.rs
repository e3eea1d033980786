//! Data-driven content for the boss encounter.
//!
//! This crate houses static game content and the loaders that turn it into
//! core types:
//! - Action catalog (RON) into a validated `ActionRegistry`
//! - Character classes (RON) into a `ClassCatalog`
//! - Session tunables (TOML) into `GameConfig`
//! - Encounter layouts (RON) into spawn requests
//!
//! A default set of every file is embedded in the crate so hosts and tests
//! can run without a data directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionCatalog, ActionLoader, ClassLoader, ConfigLoader, Content, ContentFactory, Encounter,
    EncounterLoader, LoadResult, SpawnSpec,
};

//! Read-only services consumed by the action pipeline.
//!
//! Oracles expose class definitions, spatial queries and randomness. The
//! [`Env`] aggregate bundles them with the action registry and the session
//! configuration so logics reach everything through one borrowed handle.
mod classes;
mod error;
mod rng;
mod spatial;

pub use classes::{CharacterClass, ClassCatalog, ClassId, ClassOracle, SkillSet};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed, roll};
pub use spatial::{NaiveSpatialOracle, SpatialOracle};

use crate::action::ActionRegistry;
use crate::config::GameConfig;

/// Borrowed bundle of everything a tick reads but never writes.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub actions: &'a ActionRegistry,
    pub classes: &'a dyn ClassOracle,
    pub spatial: &'a dyn SpatialOracle,
    pub rng: &'a dyn RngOracle,
    pub config: &'a GameConfig,
}

impl<'a> Env<'a> {
    pub fn new(
        actions: &'a ActionRegistry,
        classes: &'a dyn ClassOracle,
        spatial: &'a dyn SpatialOracle,
        rng: &'a dyn RngOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            actions,
            classes,
            spatial,
            rng,
            config,
        }
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("actions", &self.actions.len())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

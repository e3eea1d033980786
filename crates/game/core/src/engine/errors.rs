//! Error types for the simulation engine.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::StateError;

/// Errors surfaced while spawning an actor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnError {
    #[error("spawn rejected by world: {0}")]
    State(#[from] StateError),

    #[error("spawn rejected by oracle: {0}")]
    Oracle(#[from] OracleError),
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}

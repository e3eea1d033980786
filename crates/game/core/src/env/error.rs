//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::env::ClassId;

/// Errors that occur when wiring or querying oracles.
///
/// Missing oracles are raised when the engine is assembled, never mid-tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// The action registry was not provided.
    #[error("action registry not available")]
    ActionsNotAvailable,

    /// ClassOracle was not provided.
    #[error("ClassOracle not available")]
    ClassesNotAvailable,

    /// SpatialOracle was not provided.
    #[error("SpatialOracle not available")]
    SpatialNotAvailable,

    /// RngOracle was not provided.
    #[error("RngOracle not available")]
    RngNotAvailable,

    /// Character class was not found by id.
    #[error("character class {0:?} not found")]
    ClassNotFound(ClassId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            ActionsNotAvailable | ClassesNotAvailable | SpatialNotAvailable | RngNotAvailable => {
                ErrorSeverity::Fatal
            }
            ClassNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ActionsNotAvailable => "ORACLE_ACTIONS_NOT_AVAILABLE",
            ClassesNotAvailable => "ORACLE_CLASSES_NOT_AVAILABLE",
            SpatialNotAvailable => "ORACLE_SPATIAL_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ClassNotFound(_) => "ORACLE_CLASS_NOT_FOUND",
        }
    }
}

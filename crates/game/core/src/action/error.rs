//! Action pipeline errors.
//!
//! Gameplay requests never fail with an error: a request that makes no sense
//! is logged and dropped. The errors below cover content validation at
//! startup, pool misuse and wire decoding.

use crate::action::{ActionId, ActionLogic};
use crate::error::{ErrorSeverity, GameError};

// ============================================================================
// Registry Validation Errors
// ============================================================================

/// Errors found while assembling the action registry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("action id {0} is defined more than once")]
    DuplicateId(ActionId),

    #[error("no general chase action configured")]
    MissingGeneralChase,

    #[error("{role} action {id} is not registered")]
    UnknownPrototype { role: &'static str, id: ActionId },

    #[error("{role} action {id} must use {expected} logic, found {found}")]
    WrongPrototypeLogic {
        role: &'static str,
        id: ActionId,
        expected: ActionLogic,
        found: ActionLogic,
    },

    #[error("action {id} executes at {exec}s but lasts only {duration}s")]
    ExecTimeBeyondDuration {
        id: ActionId,
        exec: f32,
        duration: f32,
    },

    #[error("action {id} has a non-finite or negative {field}")]
    InvalidTunable { id: ActionId, field: &'static str },

    #[error("action {id} uses {logic} logic but defines no projectiles")]
    MissingProjectiles { id: ActionId, logic: ActionLogic },

    #[error("action {id} lists unknown interrupter {other}")]
    UnknownInterrupter { id: ActionId, other: ActionId },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "REGISTRY_DUPLICATE_ID",
            Self::MissingGeneralChase => "REGISTRY_MISSING_GENERAL_CHASE",
            Self::UnknownPrototype { .. } => "REGISTRY_UNKNOWN_PROTOTYPE",
            Self::WrongPrototypeLogic { .. } => "REGISTRY_WRONG_PROTOTYPE_LOGIC",
            Self::ExecTimeBeyondDuration { .. } => "REGISTRY_EXEC_BEYOND_DURATION",
            Self::InvalidTunable { .. } => "REGISTRY_INVALID_TUNABLE",
            Self::MissingProjectiles { .. } => "REGISTRY_MISSING_PROJECTILES",
            Self::UnknownInterrupter { .. } => "REGISTRY_UNKNOWN_INTERRUPTER",
        }
    }
}

// ============================================================================
// Pool Errors
// ============================================================================

/// Pool misuse. Requests are validated against the registry first, so this
/// only fires when a pool was built from a different registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolError {
    #[error("no instance pool exists for {0}")]
    UnknownAction(ActionId),
}

impl GameError for PoolError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "POOL_UNKNOWN_ACTION",
        }
    }
}

// ============================================================================
// Wire Errors
// ============================================================================

/// Errors decoding the compact request encoding.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireError {
    #[error("frame truncated: needed {needed} more bytes, {remaining} left")]
    Truncated { needed: usize, remaining: usize },

    #[error("reserved flag bits set: {0:#04x}")]
    ReservedFlags(u8),

    #[error("{0} targets exceed the encodable maximum")]
    TooManyTargets(usize),

    #[error("{0} trailing bytes after request")]
    TrailingBytes(usize),
}

impl GameError for WireError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "WIRE_TRUNCATED",
            Self::ReservedFlags(_) => "WIRE_RESERVED_FLAGS",
            Self::TooManyTargets(_) => "WIRE_TOO_MANY_TARGETS",
            Self::TrailingBytes(_) => "WIRE_TRAILING_BYTES",
        }
    }
}

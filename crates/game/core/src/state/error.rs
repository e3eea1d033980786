//! State management errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::ActorId;

/// Errors raised when spawning or removing actors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// An actor with this handle is already spawned.
    #[error("actor {0} is already spawned")]
    DuplicateActor(ActorId),

    /// No actor with this handle exists.
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateActor(_) => "STATE_DUPLICATE_ACTOR",
            Self::ActorNotFound(_) => "STATE_ACTOR_NOT_FOUND",
        }
    }
}

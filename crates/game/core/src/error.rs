//! Common error infrastructure for boss-room-core.
//!
//! Domain errors (registry validation, wire decoding, world mutation) live in
//! their own modules and implement [`GameError`] so the runtime can classify
//! them uniformly.
//!
//! # Severity
//!
//! - **Recoverable**: the caller may retry or pick another request
//! - **Validation**: malformed input, reject without retry
//! - **Internal**: the core reached a state it should never reach
//! - **Fatal**: the session cannot continue (bad content, missing oracle)

use crate::action::ActionId;
use crate::state::{ActorId, SimTime};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative request.
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: unknown actor, malformed wire payload
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Unrecoverable. Raised at startup for invalid content or wiring.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Actor that triggered the error (if applicable).
    pub actor: Option<ActorId>,

    /// Action the error relates to (if applicable).
    pub action: Option<ActionId>,

    /// Simulation time at which the error was raised.
    pub at: Option<SimTime>,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actor: None,
            action: None,
            at: None,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_action(mut self, action: ActionId) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub const fn with_time(mut self, at: SimTime) -> Self {
        self.at = Some(at);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all boss-room-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not impact
/// - Error codes are stable SCREAMING_SNAKE identifiers for logs and tests
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

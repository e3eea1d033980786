//! Unified error types surfaced by the runtime API.
//!
//! Wraps worker coordination failures and the core errors a command can
//! produce so clients bubble them up with one type.
use thiserror::Error;
use tokio::sync::oneshot;

use boss_room_core::{OracleError, SpawnError, WireError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires content (actions and classes) before building")]
    MissingContent,

    #[error("manual stepping is unavailable while the fixed-rate ticker runs")]
    AutoTickEnabled,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

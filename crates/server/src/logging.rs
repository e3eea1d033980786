//! Session directories and tracing setup.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Per-run directory holding the log file, the event stream and snapshots.
pub struct Session {
    pub id: String,
    pub dir: PathBuf,
    // Flushes the file writer when dropped.
    _guard: WorkerGuard,
}

/// Platform cache directory for session output.
///
/// - macOS: `~/Library/Caches/boss-room/sessions`
/// - Linux: `~/.cache/boss-room/sessions` (or `$XDG_CACHE_HOME/boss-room/sessions`)
/// - Windows: `%LOCALAPPDATA%\boss-room\cache\sessions`
pub fn sessions_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "boss-room")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/boss-room"))
        .join("sessions")
}

fn generate_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{timestamp}")
}

/// Logs to stderr and to `server.log` inside the session directory.
///
/// `RUST_LOG` controls the filter and defaults to `info`.
pub fn init(session_id: Option<&str>) -> Result<Session> {
    let id = session_id.map_or_else(generate_session_id, str::to_owned);
    let dir = sessions_dir().join(&id);
    init_in(&dir, id)
}

fn init_in(dir: &Path, id: String) -> Result<Session> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create session directory: {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, "server.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(session = %id, dir = %dir.display(), "logging initialized");

    Ok(Session {
        id,
        dir: dir.to_path_buf(),
        _guard: guard,
    })
}

//! Host configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Everything the headless host needs before it starts a session.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Overrides the content's tick rate when set.
    pub tick_rate_hz: Option<u32>,
    pub event_buffer: usize,
    pub command_buffer: usize,
    /// Data directory to load; the embedded content is used when unset.
    pub content_dir: Option<PathBuf>,
    pub encounter: String,
    pub session_id: Option<String>,
    /// Wall-clock seconds to run before shutting down. Zero runs until Ctrl-C.
    pub run_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: None,
            event_buffer: 256,
            command_buffer: 64,
            content_dir: None,
            encounter: "boss_arena".to_owned(),
            session_id: None,
            run_seconds: 30,
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TICK_RATE_HZ` - Simulation rate (default: from content)
    /// - `EVENT_BUFFER` - Per-topic event capacity (default: 256)
    /// - `COMMAND_BUFFER` - Command queue size (default: 64)
    /// - `CONTENT_DIR` - Content data directory (default: embedded content)
    /// - `ENCOUNTER` - Encounter to spawn (default: boss_arena)
    /// - `SESSION_ID` - Session identifier for logs and snapshots (default: auto-generated)
    /// - `RUN_SECONDS` - Run time before shutdown, 0 for no limit (default: 30)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.tick_rate_hz = read("TICK_RATE_HZ")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|hz| *hz > 0);
        if let Some(capacity) = read("EVENT_BUFFER").and_then(|v| v.trim().parse::<usize>().ok()) {
            config.event_buffer = capacity.max(1);
        }
        if let Some(capacity) = read("COMMAND_BUFFER").and_then(|v| v.trim().parse::<usize>().ok())
        {
            config.command_buffer = capacity.max(1);
        }
        config.content_dir = read("CONTENT_DIR").map(PathBuf::from);
        if let Some(encounter) = read("ENCOUNTER") {
            config.encounter = encounter;
        }
        config.session_id = read("SESSION_ID");
        if let Some(seconds) = read("RUN_SECONDS").and_then(|v| v.trim().parse().ok()) {
            config.run_seconds = seconds;
        }

        config
    }
}

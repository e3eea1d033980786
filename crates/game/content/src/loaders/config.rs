//! Game configuration loader.

use std::path::Path;

use boss_room_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys left out of the file keep their [`GameConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.tick_rate_hz == 0 {
            anyhow::bail!("tick_rate_hz must be positive");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate_hz = 20\ngame_seed = 99").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.tick_rate_hz, 20);
        assert_eq!(config.game_seed, 99);
        assert_eq!(
            config.max_queue_time_depth,
            GameConfig::DEFAULT_MAX_QUEUE_TIME_DEPTH
        );
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        assert!(ConfigLoader::parse("tick_rate_hz = 0").is_err());
    }

    #[test]
    fn embedded_config_parses() {
        let config = ConfigLoader::parse(crate::loaders::embedded::CONFIG).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}

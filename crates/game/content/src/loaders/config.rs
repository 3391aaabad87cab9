//! Game configuration loader.

use std::path::Path;

use squeak_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config: GameConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.crumb_step_turns == 0 {
            anyhow::bail!("crumb_step_turns must be positive");
        }
        if config.hand_length == 0 {
            anyhow::bail!("hand_length must be positive");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "jump_height = 2\ncrumb_cap = 30\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.jump_height, 2);
        assert_eq!(config.crumb_cap, 30);
        assert_eq!(config.hand_length, GameConfig::DEFAULT_HAND_LENGTH);
    }

    #[test]
    fn degenerate_schedule_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "crumb_step_turns = 0\n").unwrap();

        assert!(ConfigLoader::load(&path).is_err());
        assert!(ConfigLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}

//! Store configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the database file
pub const DB_ENV_VAR: &str = "FILEFINDER_DB";

/// Environment variable overriding the legacy snapshot directory
pub const LEGACY_DIR_ENV_VAR: &str = "FILEFINDER_LEGACY_DIR";

/// Where the store lives and where legacy snapshots are read from
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StoreConfig {
    /// SQLite database file
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Root of the legacy tree (`setting.json` plus a `data/` directory)
    #[serde(default)]
    pub legacy_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Load config from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from an explicit path (missing file yields defaults)
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: StoreConfig = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(StoreConfig::default())
        }
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Get the default database path
    pub fn default_db_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("search.sqlite")
    }

    /// Database file, falling back to the cache directory
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(Self::default_db_path)
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(DB_ENV_VAR) {
            if !path.trim().is_empty() {
                self.db_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(path) = std::env::var(LEGACY_DIR_ENV_VAR) {
            if !path.trim().is_empty() {
                self.legacy_dir = Some(PathBuf::from(path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::load_from(&dir.path().join("nope.yml")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let config = StoreConfig {
            db_path: Some(dir.path().join("search.sqlite")),
            legacy_dir: Some(dir.path().join("public")),
        };
        config.save_to(&path).unwrap();

        let loaded = StoreConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.resolved_db_path(), dir.path().join("search.sqlite"));
    }

    #[test]
    fn test_partial_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "legacy_dir: /srv/portal/public\n").unwrap();

        let loaded = StoreConfig::load_from(&path).unwrap();
        assert_eq!(loaded.db_path, None);
        assert_eq!(loaded.legacy_dir, Some(PathBuf::from("/srv/portal/public")));
    }
}

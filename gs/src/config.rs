//! Configuration for gpsstore

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding per-server point files and channel bindings
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Server id used when none is passed on the command line
    #[serde(default)]
    pub server: Option<String>,

    /// Channel id used when none is passed on the command line
    #[serde(default)]
    pub channel: Option<String>,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gpsstore")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            server: None,
            channel: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    ///
    /// An explicit path must load. Implicit locations (`./.gpsstore.yml`, then
    /// `~/.config/gpsstore/gpsstore.yml`) are skipped with a warning when broken.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path)
                .context(format!("Failed to load config from {}", config_path.display()));
        }

        let default_paths = [
            Some(PathBuf::from(".gpsstore.yml")),
            dirs::config_dir().map(|p| p.join("gpsstore").join("gpsstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        Ok(Config::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_store_path() {
        let config = Config::default();
        assert!(config.store_path.ends_with("gpsstore"));
        assert!(config.server.is_none());
    }

    #[test]
    fn test_load_explicit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gs.yml");
        std::fs::write(&path, "store_path: /srv/gps\nserver: \"1059965274738151475\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/srv/gps"));
        assert_eq!(config.server.as_deref(), Some("1059965274738151475"));
        assert_eq!(config.channel, None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gs.yml");
        std::fs::write(&path, "channel: general\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.channel.as_deref(), Some("general"));
        assert!(config.store_path.ends_with("gpsstore"));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}

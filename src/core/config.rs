//! Configuration with a layered hierarchy
//!
//! Built-in defaults, then `<config dir>/obra/config.yaml`, then the
//! `OBRA_*` environment variables. Command-line flags are applied on top by
//! the CLI.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::dashboard::DEFAULT_RECENT_LIMIT;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded as `uploadedBy` on attachments
    pub user: Option<String>,

    /// Default output format for list/show commands
    pub default_format: Option<String>,

    /// Rows in the dashboard's recent-projects panel
    pub recent_limit: Option<usize>,
}

impl Config {
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&path) {
                config.merge(global);
            }
        }

        config.merge(Self::from_env(|key| std::env::var(key).ok()));
        config
    }

    /// Parse a config file; missing files are silent, broken ones warn
    pub fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config ignored");
                None
            }
        }
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            user: var("OBRA_USER").filter(|v| !v.trim().is_empty()),
            default_format: var("OBRA_FORMAT").filter(|v| !v.trim().is_empty()),
            recent_limit: var("OBRA_RECENT_LIMIT").and_then(|v| v.trim().parse().ok()),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "obra")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.user.is_some() {
            self.user = other.user;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.recent_limit.is_some() {
            self.recent_limit = other.recent_limit;
        }
    }

    /// Attachment author, falling back to the login name
    pub fn user(&self) -> String {
        if let Some(ref user) = self.user {
            return user.clone();
        }
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "Usuário".to_string())
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            user: Some("Ana".to_string()),
            default_format: Some("yaml".to_string()),
            recent_limit: None,
        };
        base.merge(Config {
            user: Some("Carlos".to_string()),
            ..Default::default()
        });
        assert_eq!(base.user.as_deref(), Some("Carlos"));
        assert_eq!(base.default_format.as_deref(), Some("yaml"));
        assert_eq!(base.recent_limit(), DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn test_env_layer() {
        let vars: HashMap<&str, &str> = [("OBRA_USER", "Fernanda"), ("OBRA_RECENT_LIMIT", "3"), ("OBRA_FORMAT", " ")]
            .into_iter()
            .collect();
        let config = Config::from_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.user(), "Fernanda");
        assert_eq!(config.recent_limit(), 3);
        assert_eq!(config.default_format, None);
    }

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "user: Roberto\nrecent_limit: 10\n").unwrap();
        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.user.as_deref(), Some("Roberto"));
        assert_eq!(config.recent_limit, Some(10));

        std::fs::write(&path, "user: [unterminated").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&dir.path().join("missing.yaml")).is_none());
    }
}

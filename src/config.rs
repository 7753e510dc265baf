//! User configuration (`~/.agrosmart/config.toml`).
//!
//! Format:
//! ```toml
//! server = "http://127.0.0.1:5000"
//! username = "farmer"
//! timeout_secs = 30
//! data_dir = "/home/me/.agrosmart/data"
//! ```
//!
//! Every key is optional. Environment variables win over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Default backend address (the Flask app's dev server)
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the backend address
pub const ENV_SERVER: &str = "AGROSMART_SERVER";

/// Environment variable overriding the login username
pub const ENV_USERNAME: &str = "AGROSMART_USERNAME";

/// Environment variable overriding the storage directory
pub const ENV_DATA_DIR: &str = "AGROSMART_DATA_DIR";

/// Environment variable holding the login password (read at login, never stored)
pub const ENV_PASSWORD: &str = "AGROSMART_PASSWORD";

/// Configuration for AgroSmart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the AgroSmart backend
    #[serde(default = "default_server")]
    pub server: String,

    /// Username used when a command needs to log in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// HTTP timeout for service calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory holding durable storage keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            username: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a path, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(ENV_SERVER).filter(|s| !s.trim().is_empty()) {
            self.server = server;
        }
        if let Some(username) = lookup(ENV_USERNAME).filter(|s| !s.trim().is_empty()) {
            self.username = Some(username);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|s| !s.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Effective storage directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "username = \"farmer\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.username.as_deref(), Some("farmer"));
        assert_eq!(config.server, DEFAULT_SERVER);
    }

    #[test]
    fn test_full_file_sets_every_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "server = \"http://agro.example:8080\"\n\
             username = \"farmer\"\n\
             timeout_secs = 5\n\
             data_dir = \"/srv/agrosmart\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server, "http://agro.example:8080");
        assert_eq!(config.username.as_deref(), Some("farmer"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.data_dir(), PathBuf::from("/srv/agrosmart"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            (ENV_SERVER, "http://10.0.0.2:5000"),
            (ENV_USERNAME, "grower"),
            (ENV_DATA_DIR, "/var/lib/agrosmart"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server, "http://10.0.0.2:5000");
        assert_eq!(config.username.as_deref(), Some("grower"));
        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/agrosmart"));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }
}

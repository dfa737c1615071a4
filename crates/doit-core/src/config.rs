//! Application configuration management.
//!
//! Configuration is stored at `~/.config/doit/config.json`. Every field has
//! a default, so a missing or partial file is fine. A few values can be
//! overridden from the environment (or a `.env` file loaded by the binary):
//!
//! - `DOIT_API_URL`: base URL of the todo API
//! - `DOIT_OFFLINE`: `1`/`true` to start in offline mode
//! - `DOIT_PAGE_SIZE`: todos per list page

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "doit";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";

/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_CONNECTIVITY_TIMEOUT_MS: u64 = 1500;

const DEFAULT_PAGE_SIZE: usize = 10;

/// Owner assigned to todos created from this client
const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not find {0} directory")]
    NoDirectory(&'static str),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub offline_mode: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connectivity_timeout_ms")]
    pub connectivity_timeout_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connectivity_timeout_ms() -> u64 {
    DEFAULT_CONNECTIVITY_TIMEOUT_MS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            offline_mode: false,
            request_timeout_secs: default_request_timeout_secs(),
            connectivity_timeout_ms: default_connectivity_timeout_ms(),
            page_size: default_page_size(),
            user_id: default_user_id(),
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::read_file(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Remember offline mode in the config file.
    ///
    /// Only `offline_mode` changes; the rest of the file is kept as written,
    /// without the environment overrides of the running process.
    pub fn save_offline_mode(offline: bool) -> Result<(), ConfigError> {
        Self::update_file(&Self::config_path()?, |config| config.offline_mode = offline)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn update_file(path: &Path, change: impl FnOnce(&mut Self)) -> Result<(), ConfigError> {
        let mut config = Self::read_file(path)?;
        change(&mut config);
        config.write_file(path)
    }

    /// Apply `DOIT_*` overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DOIT_API_URL").filter(|s| !s.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup("DOIT_OFFLINE") {
            match parse_bool(&raw) {
                Some(offline) => self.offline_mode = offline,
                None => warn!(value = %raw, "Ignoring invalid DOIT_OFFLINE"),
            }
        }

        if let Some(raw) = lookup("DOIT_PAGE_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => self.page_size = size,
                _ => warn!(value = %raw, "Ignoring invalid DOIT_PAGE_SIZE"),
            }
        }
    }

    /// Base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirectory("config"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoDirectory("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"offline_mode": true}"#).unwrap();
        assert!(config.offline_mode);
        assert_eq!(config.api_base_url, "https://dummyjson.com");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.user_id, 1);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("DOIT_API_URL", "http://localhost:8080/"),
            ("DOIT_OFFLINE", "yes"),
            ("DOIT_PAGE_SIZE", "25"),
        ]));
        assert_eq!(config.api_base(), "http://localhost:8080");
        assert!(config.offline_mode);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("DOIT_API_URL", "  "),
            ("DOIT_OFFLINE", "maybe"),
            ("DOIT_PAGE_SIZE", "0"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_saving_offline_mode_keeps_overrides_out_of_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doit").join(CONFIG_FILE);
        let on_disk = Config {
            page_size: 15,
            ..Config::default()
        };
        on_disk.write_file(&path).unwrap();

        let mut effective = Config::read_file(&path).unwrap();
        effective.apply_overrides(env(&[
            ("DOIT_API_URL", "http://localhost:9999"),
            ("DOIT_PAGE_SIZE", "50"),
        ]));
        assert_eq!(effective.page_size, 50);

        Config::update_file(&path, |config| config.offline_mode = true).unwrap();

        let saved = Config::read_file(&path).unwrap();
        assert!(saved.offline_mode);
        assert_eq!(saved.api_base_url, "https://dummyjson.com");
        assert_eq!(saved.page_size, 15);
    }

    #[test]
    fn test_missing_file_reads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::read_file(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("nope"), None);
    }
}

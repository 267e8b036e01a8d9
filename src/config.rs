//! Application configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/swayhop/config.json` (falling back to
//! `$HOME/.config`). Every field is optional — a minimal `{}` file is valid,
//! and no file at all means compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "socket_path": "/run/user/1000/sway-ipc.sock",
//!   "max_command_len": 1024
//! }
//! ```

use crate::render::DEFAULT_MAX_COMMAND_LEN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the manager's IPC socket. When unset, the binary falls back
    /// to `$I3SOCK` / `$SWAYSOCK`.
    pub socket_path: Option<PathBuf>,

    /// Cap on the rendered command length, in bytes. A decision whose
    /// rendered command exceeds this fails rather than truncates.
    pub max_command_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: None,
            max_command_len: DEFAULT_MAX_COMMAND_LEN,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "socket_path": "/tmp/test.sock",
            "max_command_len": 2048
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.socket_path, Some(PathBuf::from("/tmp/test.sock")));
        assert_eq!(cfg.max_command_len, 2048);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.socket_path, None);
        assert_eq!(cfg.max_command_len, DEFAULT_MAX_COMMAND_LEN);
    }

    #[test]
    fn deserialize_partial_config() {
        let json = r#"{ "max_command_len": 256 }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.max_command_len, 256);
        assert_eq!(cfg.socket_path, None);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "max_command_len": 256, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load(Path::new("/nonexistent/swayhop/config.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}

//! Client configuration.

use crate::mark::Mark;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the web game client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server base URL, including any application-root prefix.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Session to join. When absent a new game is requested.
    #[serde(default)]
    session_id: Option<String>,

    /// Mark the local player places (`OMARK` or `XMARK`).
    #[serde(
        default = "default_player_mark",
        serialize_with = "serialize_mark_label",
        deserialize_with = "deserialize_mark_label"
    )]
    player_mark: Mark,

    /// Interval between idle state refreshes.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_player_mark() -> Mark {
    Mark::OMark
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn serialize_mark_label<S: Serializer>(mark: &Mark, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(mark.label())
}

fn deserialize_mark_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mark, D::Error> {
    let label = String::deserialize(deserializer)?;
    parse_player_mark(&label).map_err(|e| serde::de::Error::custom(e.message))
}

/// Parses a player mark label; `BLANK` is not a player.
pub fn parse_player_mark(label: &str) -> Result<Mark, ConfigError> {
    match label.trim().to_uppercase().parse::<Mark>() {
        Ok(Mark::Blank) | Err(_) => Err(ConfigError::new(format!(
            "Invalid player mark '{}' (expected OMARK or XMARK)",
            label
        ))),
        Ok(mark) => Ok(mark),
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_id: None,
            player_mark: default_player_mark(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::new("base_url must not be empty"));
        }
        if self.player_mark.is_blank() {
            return Err(ConfigError::new("player_mark must be OMARK or XMARK"));
        }
        if self.poll_interval_ms == 0 || self.request_timeout_ms == 0 {
            return Err(ConfigError::new("intervals must be positive"));
        }
        Ok(())
    }

    /// Overrides the server URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the session id.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Drops any configured session so a new game is requested.
    pub fn without_session(mut self) -> Self {
        self.session_id = None;
        self
    }

    /// Overrides the player mark.
    pub fn with_player_mark(mut self, mark: Mark) -> Self {
        self.player_mark = mark;
        self
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ClientConfig = toml::from_str(r#"session_id = "12345""#).unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:5000");
        assert_eq!(config.session_id().as_deref(), Some("12345"));
        assert_eq!(*config.player_mark(), Mark::OMark);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_mark_label_parsed() {
        let config: ClientConfig = toml::from_str(r#"player_mark = "XMARK""#).unwrap();
        assert_eq!(*config.player_mark(), Mark::XMark);
        assert!(toml::from_str::<ClientConfig>(r#"player_mark = "BLANK""#).is_err());
    }

    #[test]
    fn test_parse_player_mark_case_insensitive() {
        assert_eq!(parse_player_mark("omark").unwrap(), Mark::OMark);
        assert!(parse_player_mark("Z").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .with_base_url("http://example.test/ttt")
            .with_session_id("42")
            .with_player_mark(Mark::XMark);
        assert_eq!(config.base_url(), "http://example.test/ttt");
        assert_eq!(config.session_id().as_deref(), Some("42"));
        assert_eq!(*config.player_mark(), Mark::XMark);
    }
}

//! Runtime configuration for the globe core.
//!
//! # Responsibility
//! - Describe logging, persistence, search and boundary-source settings.
//! - Load them from a JSON file, with every field optional.
//!
//! # Invariants
//! - A config that passed [`GlobeConfig::validate`] is accepted by
//!   [`crate::init_logging`] (when `log_dir` is set) and by
//!   [`crate::StateStore::open`].

use crate::logging::{default_log_level, normalize_level};
use crate::search::{DEFAULT_DEBOUNCE, DEFAULT_SEARCH_LIMIT};
use crate::state::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;
use std::{fs, io};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config io error: {err}"),
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::Invalid { field, message } => write!(f, "invalid config `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Globe core settings. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<String>,
    /// SQLite file holding persisted state; in-memory storage when unset.
    pub state_db_path: Option<String>,
    pub storage_key: String,
    pub search_debounce_ms: u64,
    pub search_limit: u32,
    /// GeoJSON FeatureCollection with country boundaries.
    pub boundaries_path: Option<String>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            state_db_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            search_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            search_limit: DEFAULT_SEARCH_LIMIT,
            boundaries_path: None,
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        normalize_level(&self.log_level).map_err(|message| ConfigError::Invalid {
            field: "log_level",
            message,
        })?;
        if self.storage_key.trim().is_empty() {
            return Err(invalid("storage_key", "cannot be empty"));
        }
        if self.search_limit == 0 {
            return Err(invalid("search_limit", "must be greater than zero"));
        }
        if let Some(dir) = &self.log_dir {
            if !Path::new(dir.trim()).is_absolute() {
                return Err(invalid("log_dir", "must be an absolute path"));
            }
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GlobeConfig};
    use std::time::Duration;

    #[test]
    fn missing_fields_take_defaults() {
        let config = GlobeConfig::from_json_str(r#"{"search_limit": 5}"#).unwrap();
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.storage_key, "globeState");
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.state_db_path, None);
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let cases = [
            (r#"{"log_level": "loud"}"#, "log_level"),
            (r#"{"storage_key": "  "}"#, "storage_key"),
            (r#"{"search_limit": 0}"#, "search_limit"),
            (r#"{"log_dir": "relative/logs"}"#, "log_dir"),
        ];
        for (text, expected) in cases {
            match GlobeConfig::from_json_str(text) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            GlobeConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globe.json");
        std::fs::write(&path, r#"{"storage_key": "custom"}"#).unwrap();

        let config = GlobeConfig::load(&path).unwrap();
        assert_eq!(config.storage_key, "custom");
        assert!(matches!(
            GlobeConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}

//! Server configuration read from environment variables.

use std::path::PathBuf;
use thiserror::Error;

/// Shortest accepted SESSION_KEY (cookie signing + encryption key material).
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PIN granting full administrator access.
    pub admin_pin: String,
    /// PIN granting scoring access only. Scoring is admin-only when unset.
    pub scorer_pin: Option<String>,
    /// JSON data file. Records are kept in memory only when unset.
    pub data_file: Option<PathBuf>,
    pub static_dir: PathBuf,
    pub session_key: Option<Vec<u8>>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvValue {
                    var: "PORT".to_string(),
                    reason: e.to_string(),
                })?,
            None => default_port(),
        };

        let admin_pin = get("ADMIN_PIN")
            .map(|p| p.trim().to_string())
            .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_PIN".to_string()))?;
        let scorer_pin = get("SCORER_PIN").map(|p| p.trim().to_string());
        if scorer_pin.as_deref() == Some(admin_pin.as_str()) {
            return Err(ConfigError::InvalidEnvValue {
                var: "SCORER_PIN".to_string(),
                reason: "must differ from ADMIN_PIN".to_string(),
            });
        }

        let session_key = match get("SESSION_KEY") {
            Some(key) if key.len() < MIN_SESSION_KEY_LEN => {
                return Err(ConfigError::InvalidEnvValue {
                    var: "SESSION_KEY".to_string(),
                    reason: format!("must be at least {} bytes", MIN_SESSION_KEY_LEN),
                })
            }
            other => other.map(String::into_bytes),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(default_host),
            port,
            admin_pin,
            scorer_pin,
            data_file: get("DATA_FILE").map(PathBuf::from),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_static_dir),
            session_key,
        })
    }
}

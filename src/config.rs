//! Terminal configuration.
//!
//! Configuration is stored in `.locker/config.yaml` and includes:
//! - Base URL of the locker backend
//! - HTTP timeouts
//! - The locations the terminal offers for selection
//!
//! `LOCKER_ROOT` relocates the `.locker` directory and `LOCKER_API_URL`
//! overrides the configured backend URL.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LockerError, Result};
use crate::types::{DEFAULT_LOCATIONS, Location};

pub const LOCKER_DIR: &str = ".locker";
pub const ROOT_ENV: &str = "LOCKER_ROOT";
pub const API_URL_ENV: &str = "LOCKER_API_URL";

/// Keys accepted by `config set`.
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api.url",
    "api.request_timeout",
    "api.connect_timeout",
    "locations",
];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the locker backend (default: http://localhost:5005)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Locations offered for selection, in display order
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
}

fn default_api_url() -> String {
    "http://localhost:5005".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_locations() -> Vec<String> {
    DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            locations: default_locations(),
        }
    }
}

/// Directory holding terminal state, honouring `LOCKER_ROOT`.
pub fn locker_root() -> PathBuf {
    match env::var(ROOT_ENV) {
        Ok(root) if !root.is_empty() => PathBuf::from(root),
        _ => PathBuf::from(LOCKER_DIR),
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        locker_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            LockerError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LockerError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            LockerError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        Ok(())
    }

    /// Reject values that would only fail later at request time.
    pub fn validate(&self) -> Result<()> {
        parse_api_url(&self.api_url)?;
        if self.locations.iter().any(|l| l.trim().is_empty()) {
            return Err(LockerError::Config(
                "locations cannot contain empty names".to_string(),
            ));
        }
        Ok(())
    }

    /// Backend URL from the environment or config file
    pub fn api_url(&self) -> Result<Url> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return parse_api_url(&url);
        }
        parse_api_url(&self.api_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Resolve a user-entered location against the configured list.
    pub fn parse_location(&self, name: &str) -> Result<Location> {
        Location::parse_in(name, &self.locations)
    }

    /// Set a value by its dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.url" => {
                parse_api_url(value)?;
                self.api_url = value.to_string();
            }
            "api.request_timeout" => self.request_timeout = parse_seconds(key, value)?,
            "api.connect_timeout" => self.connect_timeout = parse_seconds(key, value)?,
            "locations" => {
                let locations: Vec<String> = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if locations.is_empty() {
                    return Err(LockerError::Config(
                        "locations must name at least one city".to_string(),
                    ));
                }
                self.locations = locations;
            }
            _ => {
                return Err(LockerError::Config(format!(
                    "unknown config key '{}'. Valid keys: {}",
                    key,
                    VALID_CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn parse_api_url(value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| LockerError::Config(format!("invalid api url '{value}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(LockerError::Config(format!(
            "invalid api url '{value}': unsupported scheme '{scheme}'"
        ))),
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(LockerError::Config(format!(
            "invalid value '{value}' for {key}. Expected a positive number of seconds"
        ))),
    }
}

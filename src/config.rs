//! Configuration module
//!
//! The application reads a TOML file (default
//! `~/.config/court-booking/config.toml`). Every section and every key is
//! optional; anything missing falls back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ClockTime, Court, OpeningHours};
use crate::infrastructure::storage::LockOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `<config dir>/court-booking/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("court-booking")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub facility: FacilityConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let cfg = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.facility
            .opening_minutes()
            .zip(self.facility.closing_minutes())
            .filter(|(open, close)| open < close)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "facility hours {}-{} are not a valid HH:MM range",
                    self.facility.opening_time, self.facility.closing_time
                ))
            })?;
        if self.facility.slot_minutes == 0 {
            return Err(ConfigError::Invalid("facility.slot_minutes must be > 0".into()));
        }
        if self.facility.courts.iter().any(|c| c.id.trim().is_empty()) {
            return Err(ConfigError::Invalid("facility.courts entries need an id".into()));
        }
        if self.storage.lock_retry_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "storage.lock_retry_interval_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON array file per entity type
    pub data_dir: PathBuf,
    pub lock_timeout_ms: u64,
    pub lock_retry_interval_ms: u64,
    /// Lock markers older than this are treated as abandoned. 0 disables.
    pub stale_lock_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            lock_timeout_ms: 5000,
            lock_retry_interval_ms: 50,
            stale_lock_secs: 60,
        }
    }
}

impl StorageConfig {
    pub fn lock_options(&self) -> LockOptions {
        LockOptions {
            timeout: Duration::from_millis(self.lock_timeout_ms),
            retry_interval: Duration::from_millis(self.lock_retry_interval_ms),
            stale_after: (self.stale_lock_secs > 0)
                .then(|| Duration::from_secs(self.stale_lock_secs)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// First bookable minute, `HH:MM`
    pub opening_time: String,
    /// End of the last bookable slot, `HH:MM`
    pub closing_time: String,
    /// Width of the availability grid slots
    pub slot_minutes: u16,
    /// Seed for `courts.json` when the file does not exist yet
    pub courts: Vec<CourtSeed>,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            opening_time: "07:00".to_string(),
            closing_time: "22:00".to_string(),
            slot_minutes: 60,
            courts: vec![
                CourtSeed::new("1", "Court 1", "hard"),
                CourtSeed::new("2", "Court 2", "hard"),
                CourtSeed::new("3", "Court 3", "clay"),
                CourtSeed::new("4", "Court 4", "indoor"),
            ],
        }
    }
}

impl FacilityConfig {
    pub fn opening_minutes(&self) -> Option<u16> {
        ClockTime::parse(&self.opening_time).ok().map(|t| t.minutes())
    }

    pub fn closing_minutes(&self) -> Option<u16> {
        ClockTime::parse(&self.closing_time).ok().map(|t| t.minutes())
    }

    pub fn opening_hours(&self) -> Result<OpeningHours, ConfigError> {
        let open = ClockTime::parse(&self.opening_time).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let close = ClockTime::parse(&self.closing_time).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        OpeningHours::new(open, close, self.slot_minutes).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn court_seeds(&self) -> Vec<Court> {
        self.courts
            .iter()
            .map(|c| Court::new(c.id.clone(), c.name.clone(), c.court_type.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtSeed {
    pub id: String,
    pub name: String,
    pub court_type: String,
}

impl CourtSeed {
    pub fn new(id: &str, name: &str, court_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            court_type: court_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "court-booking".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn`, `error` or a full EnvFilter directive
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

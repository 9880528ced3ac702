//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (ADUNBLOCK_*)
//! 2. TOML config file (if ADUNBLOCK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, MAX_TTL_SECS};

/// Endpoint serving the JSON array of valid script sources.
pub const DEFAULT_ENDPOINT: &str = "https://config.adunblocker.com/valid_script_sources.json";

/// Where options and transients are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file at `db_path`, shared by every process pointing at it.
    #[default]
    Sqlite,
    /// Process-local maps; nothing survives a restart.
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ADUNBLOCK_*)
/// 2. TOML config file (if ADUNBLOCK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage backend for options and the script-source cache.
    ///
    /// Set via ADUNBLOCK_STORAGE environment variable (`sqlite` or `memory`).
    #[serde(default)]
    pub storage: StorageBackend,

    /// Path to SQLite database.
    ///
    /// Set via ADUNBLOCK_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Remote endpoint returning the script-source list.
    ///
    /// Set via ADUNBLOCK_ENDPOINT environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent string for the endpoint request.
    ///
    /// Set via ADUNBLOCK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via ADUNBLOCK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Seconds a successful fetch stays cached.
    ///
    /// Set via ADUNBLOCK_SUCCESS_TTL_SECS environment variable.
    #[serde(default = "default_success_ttl_secs")]
    pub success_ttl_secs: i64,

    /// Seconds a failed fetch is negative-cached.
    ///
    /// Set via ADUNBLOCK_FAILURE_TTL_SECS environment variable.
    #[serde(default = "default_failure_ttl_secs")]
    pub failure_ttl_secs: i64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./adunblock.sqlite")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_user_agent() -> String {
    concat!("adunblock/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_success_ttl_secs() -> i64 {
    300
}

fn default_failure_ttl_secs() -> i64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            db_path: default_db_path(),
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            success_ttl_secs: default_success_ttl_secs(),
            failure_ttl_secs: default_failure_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `ADUNBLOCK_`
    /// 2. TOML file from `ADUNBLOCK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ADUNBLOCK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ADUNBLOCK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

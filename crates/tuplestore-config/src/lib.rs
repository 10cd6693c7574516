//! # Tuplestore Config - Configuration Management
//!
//! Handles configuration loading from files and environment variables.

pub mod validation;

use std::{path::Path, time::Duration};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tuplestore_const::{DEFAULT_SLOW_QUERY_THRESHOLD_MS, ENV_PREFIX};

pub use validation::{validate, ValidationError, ValidationResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Executions slower than this are logged at warn level (0 disables)
    #[serde(default = "default_slow_query_threshold_ms")]
    pub slow_query_threshold_ms: u64,
}

fn default_slow_query_threshold_ms() -> u64 {
    DEFAULT_SLOW_QUERY_THRESHOLD_MS
}

impl QueryConfig {
    pub fn slow_query_threshold(&self) -> Option<Duration> {
        match self.slow_query_threshold_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { slow_query_threshold_ms: default_slow_query_threshold_ms() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// One of `pretty`, `compact`, `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: default_log_level(), log_format: default_log_format() }
    }
}

/// Load configuration from file and environment
///
/// The file is optional; `TUPLESTORE__<SECTION>__<KEY>` variables override it.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let builder = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    builder.try_deserialize()
}

/// Load configuration with defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
    load(path).unwrap_or_default()
}

//! Structured logging utilities
//!
//! Provides subscriber installation with contextual fields and formatting options.

use std::str::FromStr;

use tracing::Span;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
use tuplestore_config::ObservabilityConfig;
use tuplestore_const::DEFAULT_LOG_FILTER;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (for development)
    Pretty,
    /// Compact format without colors
    Compact,
    /// JSON format (for production)
    Json,
}

#[allow(clippy::derivable_impls)]
impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        {
            LogFormat::Pretty
        }
        #[cfg(not(debug_assertions))]
        {
            LogFormat::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("unknown log format: {}", other)),
        }
    }
}

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub include_location: bool,
    pub include_target: bool,
    /// Whether to log span events (new/close)
    pub log_spans: bool,
    /// Environment filter (e.g., "info,tuplestore=debug")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            include_location: cfg!(debug_assertions),
            include_target: true,
            log_spans: false,
            filter: None,
        }
    }
}

impl TryFrom<&ObservabilityConfig> for LogConfig {
    type Error = anyhow::Error;

    fn try_from(config: &ObservabilityConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            format: config.log_format.parse()?,
            filter: Some(config.log_level.to_lowercase()),
            ..Self::default()
        })
    }
}

/// Initialize the global subscriber
///
/// An explicit `filter` wins over `RUST_LOG`, which wins over the default filter.
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter = if let Some(filter) = config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let fmt_span = if config.log_spans { FmtSpan::NEW | FmtSpan::CLOSE } else { FmtSpan::NONE };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(fmt_span);

    match config.format {
        LogFormat::Pretty => subscriber
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize pretty logger: {}", e))?,
        LogFormat::Compact => subscriber
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize compact logger: {}", e))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize JSON logger: {}", e))?,
    }

    tracing::info!(format = ?config.format, "Logging initialized");

    Ok(())
}

/// Span for one query execution; `rows` and `duration_ms` are recorded on completion
pub fn query_span(namespace: &str, as_of: u64) -> Span {
    tracing::debug_span!(
        "tuple_query",
        namespace = namespace,
        as_of = as_of,
        rows = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

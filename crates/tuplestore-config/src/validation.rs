//! Configuration validation

use thiserror::Error;

use crate::{Config, ObservabilityConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0} (must be one of: trace, debug, info, warn, error)")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0} (must be one of: pretty, compact, json)")]
    InvalidLogFormat(String),

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate complete configuration
pub fn validate(config: &Config) -> ValidationResult<()> {
    validate_observability(&config.observability)
}

/// Validate observability configuration, reporting every bad field
pub fn validate_observability(config: &ObservabilityConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.log_level.clone()));
    }

    if !LOG_FORMATS.contains(&config.log_format.to_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogFormat(config.log_format.clone()));
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let config = ObservabilityConfig { log_level: "DEBUG".to_string(), ..Default::default() };
        assert!(validate_observability(&config).is_ok());
    }

    #[test]
    fn test_invalid_fields_are_collected() {
        let config = ObservabilityConfig {
            log_level: "verbose".to_string(),
            log_format: "xml".to_string(),
        };
        match validate_observability(&config) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {:?}", other),
        }

        let config = ObservabilityConfig { log_format: "xml".to_string(), ..Default::default() };
        assert!(matches!(
            validate_observability(&config),
            Err(ValidationError::InvalidLogFormat(format)) if format == "xml"
        ));
    }
}

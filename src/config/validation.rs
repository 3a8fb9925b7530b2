//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Reject header names the transport would refuse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.{0} must be > 0")]
    ZeroTimeout(&'static str),

    #[error("default header name {0:?} is empty or contains whitespace")]
    InvalidHeaderName(String),

    #[error("user_agent must not be empty")]
    EmptyUserAgent,

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }

    let mut names: Vec<&String> = config.default_headers.keys().collect();
    names.sort();
    for name in names {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    if matches!(config.user_agent.as_deref(), Some(agent) if agent.trim().is_empty()) {
        errors.push(ValidationError::EmptyUserAgent);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid holiday entry: {0}")]
    InvalidHoliday(String),

    #[error("Deadline term must be positive: {0}")]
    InvalidTerm(&'static str),

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid reply address template: {0}")]
    InvalidReplyTemplate(String),

    #[error("Invalid run-at time: {0}")]
    InvalidRunAtTime(String),

    #[error("No run-at times configured")]
    NoRunAtTimes,

    #[error("Invalid poll interval")]
    InvalidPollInterval,
}

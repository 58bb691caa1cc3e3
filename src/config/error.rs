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
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Grace period must be at least 1 day")]
    InvalidGracePeriod,

    #[error("Max payment retries must be at least 1")]
    InvalidMaxRetries,

    #[error("Final warning window must fit inside the grace period")]
    InvalidFinalWarningWindow,

    #[error("Invalid provider API key format")]
    InvalidProviderKey,

    #[error("Invalid webhook secret format")]
    InvalidWebhookSecret,
}

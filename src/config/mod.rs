//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRAINFORGE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use trainforge_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod billing;
mod error;
mod provider;

pub use billing::BillingConfig;
pub use error::{ConfigError, ValidationError};
pub use provider::ProviderConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Grace-period and dunning knobs
    #[serde(default)]
    pub billing: BillingConfig,

    /// Payment provider credentials
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads environment variables with the
    /// `TRAINFORGE` prefix, using `__` to separate nested values:
    ///
    /// - `TRAINFORGE__BILLING__GRACE_PERIOD_DAYS=7`
    /// - `TRAINFORGE__PROVIDER__API_KEY=sk_test_...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRAINFORGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.billing.validate()?;
        self.provider.validate()?;
        Ok(())
    }
}

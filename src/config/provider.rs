//! Payment provider configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment provider credentials.
///
/// Consumed by the host: the webhook endpoint verifying signatures and the
/// real `BillingProvider` adapter both need these, and they are validated
/// here so a misconfigured deployment fails at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// Provider secret API key
    pub api_key: String,

    /// Webhook signing secret
    pub webhook_secret: String,
}

impl ProviderConfig {
    /// Check if using provider test mode
    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with("sk_test_")
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER_API_KEY"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER_WEBHOOK_SECRET"));
        }
        if !self.api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidProviderKey);
        }
        if !self.webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ProviderConfig {
        ProviderConfig {
            api_key: "sk_test_abcd1234".to_string(),
            webhook_secret: "whsec_xyz789".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
        assert!(valid_config().is_test_mode());
    }

    #[test]
    fn missing_api_key_rejected() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_key_prefix_rejected() {
        let config = ProviderConfig {
            api_key: "pk_test_abcd".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_webhook_secret_prefix_rejected() {
        let config = ProviderConfig {
            webhook_secret: "secret_x".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }
}

//! Billing and dunning configuration

use serde::Deserialize;

use crate::domain::subscription::DunningPolicy;

use super::error::ValidationError;

fn default_grace_period_days() -> i64 {
    7
}

fn default_max_payment_retries() -> u32 {
    3
}

fn default_final_warning_days() -> i64 {
    1
}

/// Billing configuration: grace-period and dunning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Days a subscription stays in grace after a failed payment.
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: i64,

    /// Failed attempts before dunning escalates.
    #[serde(default = "default_max_payment_retries")]
    pub max_payment_retries: u32,

    /// Days before the grace deadline at which the final warning is sent.
    #[serde(default = "default_final_warning_days")]
    pub final_warning_days: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            grace_period_days: default_grace_period_days(),
            max_payment_retries: default_max_payment_retries(),
            final_warning_days: default_final_warning_days(),
        }
    }
}

impl BillingConfig {
    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.grace_period_days < 1 {
            return Err(ValidationError::InvalidGracePeriod);
        }
        if self.max_payment_retries < 1 {
            return Err(ValidationError::InvalidMaxRetries);
        }
        if self.final_warning_days < 0 || self.final_warning_days > self.grace_period_days {
            return Err(ValidationError::InvalidFinalWarningWindow);
        }
        Ok(())
    }

    /// Dunning policy derived from this configuration.
    pub fn dunning_policy(&self) -> DunningPolicy {
        DunningPolicy {
            grace_period_days: self.grace_period_days,
            max_payment_retries: self.max_payment_retries,
            final_warning_days: self.final_warning_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BillingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grace_period_days, 7);
        assert_eq!(config.max_payment_retries, 3);
        assert_eq!(config.final_warning_days, 1);
    }

    #[test]
    fn zero_grace_period_rejected() {
        let config = BillingConfig {
            grace_period_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retries_rejected() {
        let config = BillingConfig {
            max_payment_retries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn final_warning_outside_grace_rejected() {
        let config = BillingConfig {
            grace_period_days: 3,
            final_warning_days: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn dunning_policy_mirrors_config() {
        let config = BillingConfig {
            grace_period_days: 10,
            max_payment_retries: 5,
            final_warning_days: 2,
        };
        let policy = config.dunning_policy();
        assert_eq!(policy.grace_period_days, 10);
        assert_eq!(policy.max_payment_retries, 5);
        assert_eq!(policy.final_warning_days, 2);
    }
}

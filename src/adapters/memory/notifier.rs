//! Recording notifier.
//!
//! Collects every notification instead of delivering it, so tests can
//! assert on exactly what would have gone out.

use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, TrainerId};
use crate::domain::offer::OfferItem;
use crate::ports::Notifier;

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    Welcome {
        email: String,
        package_name: String,
        is_reactivation: bool,
    },
    PaymentFailed {
        email: String,
        package_name: String,
        grace_period_end: Timestamp,
    },
    GracePeriodEnding {
        email: String,
        package_name: String,
        grace_period_end: Timestamp,
    },
    SubscriptionCancelled {
        email: String,
        package_name: String,
        end_date: Timestamp,
    },
    TrialEnding {
        email: String,
        package_name: String,
        days_remaining: i64,
    },
    OfferExpired {
        trainer_id: TrainerId,
        client_email: String,
        packages: Vec<OfferItem>,
        expires_at: Timestamp,
    },
    TrainerPaymentReceived {
        trainer_id: TrainerId,
        client_email: String,
        package_name: String,
        amount_cents: i64,
    },
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.read().await.clone()
    }

    async fn record(&self, notification: SentNotification) -> Result<(), DomainError> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn subscription_welcome(
        &self,
        email: &str,
        package_name: &str,
        is_reactivation: bool,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::Welcome {
            email: email.to_string(),
            package_name: package_name.to_string(),
            is_reactivation,
        })
        .await
    }

    async fn payment_failed(
        &self,
        email: &str,
        package_name: &str,
        grace_period_end: Timestamp,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::PaymentFailed {
            email: email.to_string(),
            package_name: package_name.to_string(),
            grace_period_end,
        })
        .await
    }

    async fn grace_period_ending(
        &self,
        email: &str,
        package_name: &str,
        grace_period_end: Timestamp,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::GracePeriodEnding {
            email: email.to_string(),
            package_name: package_name.to_string(),
            grace_period_end,
        })
        .await
    }

    async fn subscription_cancelled(
        &self,
        email: &str,
        package_name: &str,
        end_date: Timestamp,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::SubscriptionCancelled {
            email: email.to_string(),
            package_name: package_name.to_string(),
            end_date,
        })
        .await
    }

    async fn trial_ending(
        &self,
        email: &str,
        package_name: &str,
        days_remaining: i64,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::TrialEnding {
            email: email.to_string(),
            package_name: package_name.to_string(),
            days_remaining,
        })
        .await
    }

    async fn offer_expired(
        &self,
        trainer_id: &TrainerId,
        client_email: &str,
        packages: &[OfferItem],
        expires_at: Timestamp,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::OfferExpired {
            trainer_id: *trainer_id,
            client_email: client_email.to_string(),
            packages: packages.to_vec(),
            expires_at,
        })
        .await
    }

    async fn trainer_payment_received(
        &self,
        trainer_id: &TrainerId,
        client_email: &str,
        package_name: &str,
        amount_cents: i64,
    ) -> Result<(), DomainError> {
        self.record(SentNotification::TrainerPaymentReceived {
            trainer_id: *trainer_id,
            client_email: client_email.to_string(),
            package_name: package_name.to_string(),
            amount_cents,
        })
        .await
    }
}

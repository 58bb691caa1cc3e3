//! Notifier port.
//!
//! Outbound user and trainer communication triggered by lifecycle events.
//! Delivery channel (email, push, in-app row) is an implementation concern;
//! the engine names the moments and hands over the full payload each
//! message needs, so implementations never have to re-query state.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, TrainerId};
use crate::domain::offer::OfferItem;

/// Port for lifecycle notifications.
///
/// All notifications are fire-and-forget from the engine's point of view:
/// handlers log failures but never fail the event over a notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Welcome the user to a newly created subscription.
    async fn subscription_welcome(
        &self,
        email: &str,
        package_name: &str,
        is_reactivation: bool,
    ) -> Result<(), DomainError>;

    /// A payment failed; the subscription entered its grace period.
    async fn payment_failed(
        &self,
        email: &str,
        package_name: &str,
        grace_period_end: Timestamp,
    ) -> Result<(), DomainError>;

    /// Last warning before the grace deadline.
    async fn grace_period_ending(
        &self,
        email: &str,
        package_name: &str,
        grace_period_end: Timestamp,
    ) -> Result<(), DomainError>;

    /// The subscription was cancelled and access revoked as of `end_date`.
    async fn subscription_cancelled(
        &self,
        email: &str,
        package_name: &str,
        end_date: Timestamp,
    ) -> Result<(), DomainError>;

    /// The trial ends within the provider's warning window.
    async fn trial_ending(
        &self,
        email: &str,
        package_name: &str,
        days_remaining: i64,
    ) -> Result<(), DomainError>;

    /// A trainer's offer expired unused, with the package summary the
    /// client walked away from.
    async fn offer_expired(
        &self,
        trainer_id: &TrainerId,
        client_email: &str,
        packages: &[OfferItem],
        expires_at: Timestamp,
    ) -> Result<(), DomainError>;

    /// A recurring payment on one of the trainer's plans came in
    /// (email + push + in-app row on the implementation side).
    async fn trainer_payment_received(
        &self,
        trainer_id: &TrainerId,
        client_email: &str,
        package_name: &str,
        amount_cents: i64,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn Notifier) {}
    }
}

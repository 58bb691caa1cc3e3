//! Handler for failed invoice payments (grace period and dunning).

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{InvoiceEvent, ProviderEvent, ProviderEventType};
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{DunningAssessment, DunningPolicy};
use crate::ports::{CatalogReader, Notifier, SubscriptionRepository, UserDirectory};

/// Enters (or extends) the grace period on a failed payment and escalates
/// dunning warnings.
///
/// Reaching the retry maximum is logged as an escalation point only; no
/// automatic cancellation is performed here. Cancellation arrives as an
/// explicit provider deletion event.
///
/// The final warning is evaluated against the deadline set by this same
/// failure. Each failure pushes the deadline out by the full grace window,
/// so with the default policy (7-day grace, 1-day warning window) the
/// warning branch cannot trigger from this path; see DESIGN.md.
pub struct PaymentFailedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
    policy: DunningPolicy,
}

impl PaymentFailedHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
        policy: DunningPolicy,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            users,
            notifier,
            policy,
        }
    }
}

#[async_trait]
impl EventHandler for PaymentFailedHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::InvoicePaymentFailed]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let invoice = InvoiceEvent::decode(event)?;

        // Manual invoices with no subscription linkage are expected.
        let Some(subscription_ref) = &invoice.subscription_ref else {
            return Err(EngineError::Ignored(format!(
                "Invoice {} has no subscription linkage",
                invoice.invoice_ref
            )));
        };

        let Some(mut subscription) = self
            .subscriptions
            .find_by_provider_ref(subscription_ref)
            .await?
        else {
            return Err(EngineError::unresolved("subscription", subscription_ref));
        };

        let now = Timestamp::now();
        let deadline = self.policy.grace_deadline(now);
        let retries = match subscription.record_payment_failure(now, deadline) {
            Ok(retries) => retries,
            Err(e) => {
                return Err(EngineError::Ignored(format!(
                    "Payment failure on {}: {}",
                    subscription_ref, e
                )))
            }
        };
        self.subscriptions.update(&subscription).await?;

        if self.policy.assess(retries) == DunningAssessment::Escalated {
            tracing::warn!(
                subscription_ref = %subscription_ref,
                retries,
                max = self.policy.max_payment_retries,
                "Dunning escalation threshold reached"
            );
        }

        let Some(user) = self.users.find_by_id(&subscription.user_id).await? else {
            tracing::warn!(
                user_id = %subscription.user_id,
                "No user account for failing subscription, skipping notifications"
            );
            return Ok(());
        };

        let package_name = self
            .catalog
            .find_by_id(&subscription.package_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| subscription.provider_price_ref.clone());

        if let Err(e) = self
            .notifier
            .payment_failed(&user.email, &package_name, deadline)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Payment-failed notification failed");
        }

        if self.policy.should_send_final_warning(retries, deadline, now) {
            if let Err(e) = self
                .notifier
                .grace_period_ending(&user.email, &package_name, deadline)
                .await
            {
                tracing::warn!(user_id = %user.id, error = %e, "Final-warning notification failed");
            }
        }

        tracing::info!(
            subscription_ref = %subscription_ref,
            retries,
            grace_period_end = %deadline.as_unix_secs(),
            "Payment failed, grace period applied"
        );
        Ok(())
    }
}

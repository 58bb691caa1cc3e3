//! Handler for successful invoice payments.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::coupling::CouplingController;
use crate::application::delivery_generator::DeliveryGenerator;
use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{InvoiceEvent, ProviderEvent, ProviderEventType};
use crate::domain::foundation::Timestamp;
use crate::ports::{CatalogReader, Notifier, SubscriptionRepository, UserDirectory};

/// Recovers the subscription from any grace period, advances its period
/// end, and drives the coaching side effects of a paid invoice.
///
/// For coaching-class subscriptions a successful payment also:
/// - pauses or extends the pause on the user's yearly plan (coupling rule)
/// - generates the billing period's delivery, unless the invoice's billing
///   reason marks it as the initial subscription-creation invoice (already
///   covered by checkout completion)
/// - notifies the trainer of the payment
pub struct PaymentSucceededHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    coupling: Arc<CouplingController>,
    deliveries: Arc<DeliveryGenerator>,
    notifier: Arc<dyn Notifier>,
}

impl PaymentSucceededHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        coupling: Arc<CouplingController>,
        deliveries: Arc<DeliveryGenerator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            users,
            coupling,
            deliveries,
            notifier,
        }
    }
}

#[async_trait]
impl EventHandler for PaymentSucceededHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::InvoicePaymentSucceeded]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let invoice = InvoiceEvent::decode(event)?;

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
        if let Err(e) = subscription.record_payment_success(now, invoice.period) {
            return Err(EngineError::Ignored(format!(
                "Payment success on {}: {}",
                subscription_ref, e
            )));
        }
        self.subscriptions.update(&subscription).await?;

        let Some(package) = self.catalog.find_by_id(&subscription.package_id).await? else {
            tracing::warn!(
                subscription_ref = %subscription_ref,
                package_id = %subscription.package_id,
                "Paid subscription references unknown package, skipping side effects"
            );
            return Ok(());
        };

        if package.is_coaching() {
            if let Err(e) = self
                .coupling
                .on_coaching_payment(&subscription.user_id, &subscription.id, now)
                .await
            {
                tracing::warn!(
                    user_id = %subscription.user_id,
                    error = %e,
                    "Coupling pause on coaching payment failed"
                );
            }

            if !invoice.is_subscription_create() {
                self.deliveries
                    .generate_recurring(
                        &invoice.invoice_ref,
                        &subscription,
                        &package,
                        invoice.period,
                        now,
                    )
                    .await?;

                if let Some(trainer_id) = subscription.trainer_id.or(package.trainer_id) {
                    let client_email = self
                        .users
                        .find_by_id(&subscription.user_id)
                        .await?
                        .map(|u| u.email)
                        .unwrap_or_default();
                    if let Err(e) = self
                        .notifier
                        .trainer_payment_received(
                            &trainer_id,
                            &client_email,
                            &package.name,
                            invoice.amount_paid,
                        )
                        .await
                    {
                        tracing::warn!(
                            trainer_id = %trainer_id,
                            error = %e,
                            "Trainer payment notification failed"
                        );
                    }
                }
            }
        }

        tracing::info!(
            subscription_ref = %subscription_ref,
            invoice_ref = %invoice.invoice_ref,
            "Payment succeeded, subscription active"
        );
        Ok(())
    }
}

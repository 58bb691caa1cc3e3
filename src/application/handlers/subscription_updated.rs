//! Handler for provider subscription-updated notifications.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{ProviderEvent, ProviderEventType, SubscriptionUpdated};
use crate::domain::subscription::SubscriptionStatus;
use crate::ports::{CatalogReader, SubscriptionRepository, UserDirectory};

/// Applies provider status updates and plan switches to the local record.
///
/// Updates for unknown subscriptions are logged and dropped; they are not
/// recoverable locally. A changed price reference signals a plan switch:
/// the package is re-resolved, and a coaching-package destination also
/// reassigns the user's trainer.
pub struct SubscriptionUpdatedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
}

impl SubscriptionUpdatedHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            users,
        }
    }
}

#[async_trait]
impl EventHandler for SubscriptionUpdatedHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::SubscriptionUpdated]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = SubscriptionUpdated::decode(event)?;

        let Some(mut subscription) = self
            .subscriptions
            .find_by_provider_ref(&payload.subscription_ref)
            .await?
        else {
            return Err(EngineError::unresolved(
                "subscription",
                &payload.subscription_ref,
            ));
        };

        let target = SubscriptionStatus::from_provider(&payload.provider_status);
        if let Err(e) = subscription.apply_provider_status(target, payload.period_end) {
            return Err(EngineError::Ignored(format!(
                "Stale status update for {}: {}",
                payload.subscription_ref, e
            )));
        }

        // A new price reference signals a plan switch.
        if let Some(price_ref) = &payload.price_ref {
            if *price_ref != subscription.provider_price_ref {
                match self.catalog.find_by_price_ref(price_ref).await? {
                    Some(package) => {
                        subscription.switch_package(package.id, price_ref.clone());
                        if package.is_coaching() {
                            if let Some(trainer_id) = package.trainer_id {
                                subscription.trainer_id = Some(trainer_id);
                                self.users
                                    .assign_trainer(&subscription.user_id, &trainer_id)
                                    .await?;
                                tracing::info!(
                                    subscription_ref = %payload.subscription_ref,
                                    trainer_id = %trainer_id,
                                    "Plan switch to coaching package, trainer reassigned"
                                );
                            }
                        }
                    }
                    None => {
                        tracing::warn!(
                            subscription_ref = %payload.subscription_ref,
                            price_ref = %price_ref,
                            "Plan switch to unknown price reference, keeping current package"
                        );
                    }
                }
            }
        }

        self.subscriptions.update(&subscription).await?;

        tracing::info!(
            subscription_ref = %payload.subscription_ref,
            status = ?subscription.status,
            "Subscription updated"
        );
        Ok(())
    }
}

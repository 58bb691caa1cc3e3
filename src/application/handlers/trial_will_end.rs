//! Handler for provider trial-will-end notifications.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{ProviderEvent, ProviderEventType, TrialWillEnd};
use crate::ports::{CatalogReader, Notifier, SubscriptionRepository, UserDirectory};

/// Flips the trial flag off when the provider warns the trial is ending
/// imminently (not yet ended) and notifies the user with the days left.
pub struct TrialWillEndHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl TrialWillEndHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            users,
            notifier,
        }
    }
}

#[async_trait]
impl EventHandler for TrialWillEndHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::TrialWillEnd]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = TrialWillEnd::decode(event)?;

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

        subscription.end_trial();
        self.subscriptions.update(&subscription).await?;

        let days_remaining = subscription.trial_days_remaining();
        let package_name = self
            .catalog
            .find_by_id(&subscription.package_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| subscription.provider_price_ref.clone());
        match self.users.find_by_id(&subscription.user_id).await? {
            Some(user) => {
                if let Err(e) = self
                    .notifier
                    .trial_ending(&user.email, &package_name, days_remaining)
                    .await
                {
                    tracing::warn!(user_id = %user.id, error = %e, "Trial-ending notification failed");
                }
            }
            None => {
                tracing::warn!(
                    user_id = %subscription.user_id,
                    "No user account for trial-ending subscription, skipping notification"
                );
            }
        }

        tracing::info!(
            subscription_ref = %payload.subscription_ref,
            days_remaining,
            "Trial ending"
        );
        Ok(())
    }
}

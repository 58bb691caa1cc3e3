//! Handler for provider subscription-deleted notifications.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::coupling::CouplingController;
use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{ProviderEvent, ProviderEventType, SubscriptionDeleted};
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::SubscriptionStatus;
use crate::ports::{CatalogReader, Notifier, SubscriptionRepository, UserDirectory};

/// Terminates the local record with immediate access revocation.
///
/// Sets `end_date = now` regardless of any scheduled future period end. A
/// cancelled coaching package also resumes any yearly plan paused for
/// coaching and clears the user's trainer assignment.
pub struct SubscriptionDeletedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    coupling: Arc<CouplingController>,
    notifier: Arc<dyn Notifier>,
}

impl SubscriptionDeletedHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        coupling: Arc<CouplingController>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            users,
            coupling,
            notifier,
        }
    }
}

#[async_trait]
impl EventHandler for SubscriptionDeletedHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::SubscriptionDeleted]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = SubscriptionDeleted::decode(event)?;

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

        if subscription.status == SubscriptionStatus::Cancelled {
            return Err(EngineError::Ignored(format!(
                "Subscription {} already cancelled",
                payload.subscription_ref
            )));
        }

        subscription.cancel_now(Timestamp::now());
        self.subscriptions.update(&subscription).await?;

        let package = self.catalog.find_by_id(&subscription.package_id).await?;
        if package.as_ref().is_some_and(|p| p.is_coaching()) {
            if let Err(e) = self.coupling.on_coaching_ended(&subscription.user_id).await {
                tracing::warn!(
                    user_id = %subscription.user_id,
                    error = %e,
                    "Failed to resume paused yearly subscription after coaching ended"
                );
            }
            self.users.clear_trainer(&subscription.user_id).await?;
        }

        let package_name = package
            .map(|p| p.name)
            .unwrap_or_else(|| subscription.provider_price_ref.clone());
        match self.users.find_by_id(&subscription.user_id).await? {
            Some(user) => {
                if let Err(e) = self
                    .notifier
                    .subscription_cancelled(&user.email, &package_name, subscription.end_date)
                    .await
                {
                    tracing::warn!(user_id = %user.id, error = %e, "Cancellation notification failed");
                }
            }
            None => {
                tracing::warn!(
                    user_id = %subscription.user_id,
                    "No user account for cancelled subscription, skipping notification"
                );
            }
        }

        tracing::info!(
            subscription_ref = %payload.subscription_ref,
            user_id = %subscription.user_id,
            "Subscription deleted, access revoked"
        );
        Ok(())
    }
}

//! Handler for provider subscription-created notifications.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{
    CreationOrigin, ProviderEvent, ProviderEventType, SubscriptionCreated,
};
use crate::domain::foundation::{SubscriptionId, Timestamp};
use crate::domain::subscription::Subscription;
use crate::ports::{
    CatalogReader, Notifier, OfferRepository, SubscriptionRepository, UserDirectory,
};

/// Creates the local subscription record for a provider creation event.
///
/// Requires a resolvable user (by customer reference) and package (by price
/// reference); either lookup missing drops the event. A reactivation first
/// force-cancels the prior record, and an offer token marks the funding
/// offer completed.
pub struct SubscriptionCreatedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    offers: Arc<dyn OfferRepository>,
    notifier: Arc<dyn Notifier>,
}

impl SubscriptionCreatedHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        offers: Arc<dyn OfferRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            users,
            offers,
            notifier,
        }
    }

    async fn cancel_prior(&self, prior_ref: &str, now: Timestamp) -> Result<(), EngineError> {
        match self.subscriptions.find_by_provider_ref(prior_ref).await? {
            Some(mut prior) => {
                prior.cancel_now(now);
                self.subscriptions.update(&prior).await?;
                tracing::info!(
                    prior_ref = %prior_ref,
                    "Force-cancelled prior subscription for reactivation"
                );
            }
            None => {
                tracing::warn!(
                    prior_ref = %prior_ref,
                    "Reactivation references unknown prior subscription"
                );
            }
        }
        Ok(())
    }

    /// Marks the funding offer completed. Stale transitions are
    /// informational no-ops.
    async fn complete_offer(&self, token: &str, now: Timestamp) -> Result<(), EngineError> {
        let Some(mut offer) = self.offers.find_by_token(token).await? else {
            tracing::warn!(token = %token, "Subscription creation references unknown offer");
            return Ok(());
        };
        match offer.mark_completed(now) {
            Ok(()) => self.offers.update(&offer).await.map_err(Into::into),
            Err(e) => {
                tracing::info!(token = %token, reason = %e, "Offer not completed");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EventHandler for SubscriptionCreatedHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::SubscriptionCreated]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = SubscriptionCreated::decode(event)?;
        let now = Timestamp::now();

        if self
            .subscriptions
            .find_by_provider_ref(&payload.subscription_ref)
            .await?
            .is_some()
        {
            return Err(EngineError::Ignored(format!(
                "Subscription {} already exists",
                payload.subscription_ref
            )));
        }

        let user = self
            .users
            .find_by_customer_ref(&payload.customer_ref)
            .await?
            .ok_or_else(|| EngineError::unresolved("user", &payload.customer_ref))?;

        let package = self
            .catalog
            .find_by_price_ref(&payload.price_ref)
            .await?
            .ok_or_else(|| EngineError::unresolved("package", &payload.price_ref))?;

        let is_reactivation = matches!(payload.origin, CreationOrigin::Reactivation { .. });
        if let CreationOrigin::Reactivation {
            prior_subscription_ref,
        } = &payload.origin
        {
            self.cancel_prior(prior_subscription_ref, now).await?;
        }

        let subscription = Subscription::create(
            SubscriptionId::new(),
            user.id,
            package.id,
            package.trainer_id,
            payload.subscription_ref.clone(),
            payload.price_ref.clone(),
            payload.period_start,
            payload.period_end,
            payload.trial,
        );
        self.subscriptions.save(&subscription).await?;

        if package.is_coaching() {
            if let Some(trainer_id) = package.trainer_id {
                self.users.assign_trainer(&user.id, &trainer_id).await?;
            }
        }

        if let Some(token) = &payload.offer_token {
            self.complete_offer(token, now).await?;
        }

        if let Err(e) = self
            .notifier
            .subscription_welcome(&user.email, &package.name, is_reactivation)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Welcome notification failed");
        }

        tracing::info!(
            subscription_ref = %payload.subscription_ref,
            user_id = %user.id,
            package = %package.name,
            trial = subscription.is_trial_active,
            "Subscription created"
        );
        Ok(())
    }
}

//! Coaching/yearly-plan coupling controller.
//!
//! A user holding an active yearly plan who starts paying for coaching has
//! the yearly plan's collection paused at the provider for the duration of
//! coaching, tagged with a marker so the pause is distinguishable from an
//! unrelated manual pause. Repeat coaching payments extend the existing
//! pause instead of re-issuing it; when coaching ends the paused plan is
//! resumed and the marker cleared.
//!
//! Invariant: at most one subscription per user carries the marker at a
//! time. A violation (manual data changes) is logged and resolved
//! first-match-wins.

use std::sync::Arc;

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::SubscriptionStatus;
use crate::ports::{BillingProvider, CatalogReader, SubscriptionRepository};

use super::errors::EngineError;

pub struct CouplingController {
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    provider: Arc<dyn BillingProvider>,
}

impl CouplingController {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        provider: Arc<dyn BillingProvider>,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            provider,
        }
    }

    /// Reacts to a successful coaching payment for `user_id`.
    ///
    /// Extends an existing paused-for-coaching pause, or pauses the user's
    /// active yearly subscription if none is paused yet. A user without a
    /// yearly plan is a no-op.
    pub async fn on_coaching_payment(
        &self,
        user_id: &UserId,
        coaching_subscription_id: &SubscriptionId,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let paused = self.subscriptions.find_paused_for_coaching(user_id).await?;
        if paused.len() > 1 {
            tracing::warn!(
                user_id = %user_id,
                count = paused.len(),
                "More than one subscription paused for coaching; extending first match"
            );
        }

        if let Some(mut yearly) = paused.into_iter().next() {
            self.provider
                .extend_pause(&yearly.provider_subscription_ref, yearly.end_date)
                .await?;
            yearly.refresh_pause_marker(now);
            self.subscriptions.update(&yearly).await?;
            tracing::info!(
                user_id = %user_id,
                subscription_ref = %yearly.provider_subscription_ref,
                "Extended coaching pause on yearly subscription"
            );
            return Ok(());
        }

        for mut candidate in self.subscriptions.find_by_user_id(user_id).await? {
            if candidate.id == *coaching_subscription_id
                || candidate.status != SubscriptionStatus::Active
            {
                continue;
            }
            let Some(package) = self.catalog.find_by_id(&candidate.package_id).await? else {
                continue;
            };
            if !package.is_yearly() {
                continue;
            }

            self.provider
                .pause_collection(&candidate.provider_subscription_ref, candidate.end_date)
                .await?;
            candidate.mark_paused_for_coaching(now);
            self.subscriptions.update(&candidate).await?;
            tracing::info!(
                user_id = %user_id,
                subscription_ref = %candidate.provider_subscription_ref,
                "Paused yearly subscription for coaching"
            );
            return Ok(());
        }

        Ok(())
    }

    /// Reacts to the user's coaching subscription ending.
    ///
    /// Resumes the first subscription still paused with the coaching marker
    /// and clears the marker. No-op when nothing is paused.
    pub async fn on_coaching_ended(&self, user_id: &UserId) -> Result<(), EngineError> {
        let paused = self.subscriptions.find_paused_for_coaching(user_id).await?;
        if paused.len() > 1 {
            tracing::warn!(
                user_id = %user_id,
                count = paused.len(),
                "More than one subscription paused for coaching; resuming first match"
            );
        }

        if let Some(mut yearly) = paused.into_iter().next() {
            self.provider
                .resume_collection(&yearly.provider_subscription_ref)
                .await?;
            yearly.clear_pause_marker();
            self.subscriptions.update(&yearly).await?;
            tracing::info!(
                user_id = %user_id,
                subscription_ref = %yearly.provider_subscription_ref,
                "Resumed yearly subscription after coaching ended"
            );
        }

        Ok(())
    }
}

//! Subscription repository port (write side).
//!
//! Defines the contract for persisting and retrieving Subscription
//! aggregates. Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Write-focused**: Optimized for aggregate persistence
//! - **Provider-ref lookup**: Webhook events carry provider references, not
//!   internal ids, so resolution by `provider_subscription_ref` is the
//!   primary read path

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::subscription::Subscription;

/// Repository port for Subscription aggregate persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Save a new subscription.
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Update an existing subscription.
    ///
    /// # Errors
    ///
    /// - `UnresolvedSubscription` if the subscription doesn't exist
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by its internal ID.
    async fn find_by_id(&self, id: &SubscriptionId)
        -> Result<Option<Subscription>, DomainError>;

    /// Find a subscription by the provider's subscription reference.
    ///
    /// Returns `None` if no local record mirrors the reference. This is the
    /// primary lookup on webhook events.
    async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Find all subscriptions belonging to a user, in any status.
    async fn find_by_user_id(&self, user_id: &UserId)
        -> Result<Vec<Subscription>, DomainError>;

    /// Find subscriptions for a user carrying the paused-for-coaching
    /// marker.
    ///
    /// Expected to return at most one record; callers treat extras as an
    /// invariant breach and log them.
    async fn find_paused_for_coaching(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, DomainError>;
}

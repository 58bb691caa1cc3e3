//! In-memory subscription repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    records: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&subscription.id) {
            return Err(DomainError::new(
                ErrorCode::UnresolvedSubscription,
                format!("Subscription {} not found", subscription.id),
            ));
        }
        records.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|s| s.provider_subscription_ref == provider_ref)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn find_paused_for_coaching(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|s| s.user_id == *user_id && s.is_paused_for_coaching())
            .cloned()
            .collect())
    }
}

//! Handler for deleted payment-method accounts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{CustomerDeleted, ProviderEvent, ProviderEventType};
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::SubscriptionStatus;
use crate::ports::{SubscriptionRepository, UserDirectory};

/// Cancels every remaining subscription for a customer whose provider
/// account was deleted administratively.
pub struct CustomerDeletedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    users: Arc<dyn UserDirectory>,
}

impl CustomerDeletedHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            subscriptions,
            users,
        }
    }
}

#[async_trait]
impl EventHandler for CustomerDeletedHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::CustomerDeleted]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = CustomerDeleted::decode(event)?;

        let Some(user) = self
            .users
            .find_by_customer_ref(&payload.customer_ref)
            .await?
        else {
            return Err(EngineError::unresolved("user", &payload.customer_ref));
        };

        let now = Timestamp::now();
        let mut cancelled = 0u32;
        for mut subscription in self.subscriptions.find_by_user_id(&user.id).await? {
            if subscription.status == SubscriptionStatus::Cancelled {
                continue;
            }
            subscription.cancel_now(now);
            self.subscriptions.update(&subscription).await?;
            cancelled += 1;
        }

        tracing::info!(
            customer_ref = %payload.customer_ref,
            user_id = %user.id,
            cancelled,
            "Customer deleted, subscriptions cancelled"
        );
        Ok(())
    }
}

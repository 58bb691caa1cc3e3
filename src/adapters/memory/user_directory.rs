//! In-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, TrainerId, UserId};
use crate::ports::{UserAccount, UserDirectory};

#[derive(Default)]
struct Inner {
    accounts: HashMap<UserId, UserAccount>,
    by_customer_ref: HashMap<String, UserId>,
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user account under a provider customer reference.
    pub async fn insert(&self, customer_ref: &str, account: UserAccount) {
        let mut inner = self.inner.write().await;
        inner
            .by_customer_ref
            .insert(customer_ref.to_string(), account.id);
        inner.accounts.insert(account.id, account);
    }

    /// Current trainer assignment, for test assertions.
    pub async fn trainer_of(&self, user_id: &UserId) -> Option<TrainerId> {
        self.inner
            .read()
            .await
            .accounts
            .get(user_id)
            .and_then(|a| a.trainer_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_customer_ref(
        &self,
        customer_ref: &str,
    ) -> Result<Option<UserAccount>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_customer_ref
            .get(customer_ref)
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.inner.read().await.accounts.get(user_id).cloned())
    }

    async fn assign_trainer(
        &self,
        user_id: &UserId,
        trainer_id: &TrainerId,
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let account = inner.accounts.get_mut(user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::UnresolvedUser, format!("User {} not found", user_id))
        })?;
        account.trainer_id = Some(*trainer_id);
        Ok(())
    }

    async fn clear_trainer(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let account = inner.accounts.get_mut(user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::UnresolvedUser, format!("User {} not found", user_id))
        })?;
        account.trainer_id = None;
        Ok(())
    }
}

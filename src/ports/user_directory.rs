//! User directory port.
//!
//! Resolves provider customer references to platform user accounts and
//! carries the trainer-assignment writes driven by coaching plan changes.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TrainerId, UserId};

/// A platform user account as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,

    /// Currently assigned trainer, if any.
    pub trainer_id: Option<TrainerId>,
}

/// Port for user resolution and trainer assignment.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by the provider customer reference stored on their
    /// account.
    async fn find_by_customer_ref(
        &self,
        customer_ref: &str,
    ) -> Result<Option<UserAccount>, DomainError>;

    /// Find a user by internal ID.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Assign a trainer to a user (coaching plan entry or switch).
    async fn assign_trainer(
        &self,
        user_id: &UserId,
        trainer_id: &TrainerId,
    ) -> Result<(), DomainError>;

    /// Clear a user's trainer assignment (coaching plan exit).
    async fn clear_trainer(&self, user_id: &UserId) -> Result<(), DomainError>;
}

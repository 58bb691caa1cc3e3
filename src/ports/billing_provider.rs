//! Billing provider port for outbound collection commands.
//!
//! The engine is mostly a consumer of provider notifications, but the
//! coaching/yearly coupling rule requires issuing commands back to the
//! provider: pausing, extending, and resuming collection on a yearly plan.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **Idempotent**: Pausing an already-paused subscription or resuming a
//!   never-paused one must succeed without side effects

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, Timestamp};

/// Errors from outbound provider calls.
#[derive(Debug, Clone, Error)]
pub enum ProviderCallError {
    #[error("Provider network error: {0}")]
    Network(String),

    #[error("Provider rejected the request: {0}")]
    Rejected(String),

    #[error("Subscription not found at provider: {0}")]
    NotFound(String),
}

impl ProviderCallError {
    /// Whether the call is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderCallError::Network(_))
    }
}

impl From<ProviderCallError> for DomainError {
    fn from(err: ProviderCallError) -> Self {
        DomainError::storage(err.to_string())
    }
}

/// Port for outbound collection commands against the payment provider.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Pause collection on a subscription until the given resume time.
    async fn pause_collection(
        &self,
        subscription_ref: &str,
        resumes_at: Timestamp,
    ) -> Result<(), ProviderCallError>;

    /// Push the resume time of an already-paused subscription further out.
    async fn extend_pause(
        &self,
        subscription_ref: &str,
        resumes_at: Timestamp,
    ) -> Result<(), ProviderCallError>;

    /// Resume collection on a paused subscription.
    async fn resume_collection(&self, subscription_ref: &str) -> Result<(), ProviderCallError>;
}

//! Offer repository port.
//!
//! Offers are created by the trainer-facing surface; the reconciliation
//! engine only resolves them by token and advances their status.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::offer::Offer;

/// Repository port for offer resolution and status updates.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Find an offer by its external token.
    ///
    /// Returns `None` when the token resolves to nothing (stale or foreign
    /// metadata on a checkout event).
    async fn find_by_token(&self, token: &str) -> Result<Option<Offer>, DomainError>;

    /// Update an existing offer.
    ///
    /// # Errors
    ///
    /// - `UnresolvedOffer` if the offer doesn't exist
    async fn update(&self, offer: &Offer) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OfferRepository) {}
    }
}

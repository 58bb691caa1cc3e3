//! In-memory offer repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::offer::Offer;
use crate::ports::OfferRepository;

#[derive(Default)]
pub struct InMemoryOfferRepository {
    records: RwLock<HashMap<String, Offer>>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an offer; the engine itself never creates offers.
    pub async fn insert(&self, offer: Offer) {
        self.records.write().await.insert(offer.token.clone(), offer);
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Offer>, DomainError> {
        Ok(self.records.read().await.get(token).cloned())
    }

    async fn update(&self, offer: &Offer) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&offer.token) {
            return Err(DomainError::new(
                ErrorCode::UnresolvedOffer,
                format!("Offer {} not found", offer.token),
            ));
        }
        records.insert(offer.token.clone(), offer.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, TrainerId};
    use crate::domain::offer::OfferStatus;

    fn offer(token: &str) -> Offer {
        Offer::new(
            token.to_string(),
            TrainerId::new(),
            "client@example.com".to_string(),
            vec![],
            Timestamp::now().add_days(3),
        )
    }

    #[tokio::test]
    async fn insert_and_find_by_token() {
        let repo = InMemoryOfferRepository::new();
        repo.insert(offer("tok_1")).await;

        let found = repo.find_by_token("tok_1").await.unwrap().unwrap();
        assert_eq!(found.status, OfferStatus::Processing);
        assert!(repo.find_by_token("tok_other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_unknown_offer_fails() {
        let repo = InMemoryOfferRepository::new();
        let result = repo.update(&offer("tok_missing")).await;
        assert!(result.is_err());
    }
}

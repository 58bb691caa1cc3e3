//! Handler for expired checkout sessions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{CheckoutExpired, ProviderEvent, ProviderEventType};
use crate::ports::{Notifier, OfferRepository};

/// Expires the offer funded by a checkout session that ran out unused.
///
/// Only applies while the offer is still PROCESSING. A late or duplicate
/// expiry against an already-paid offer is a no-op with no notification;
/// this ordering hazard is a first-class concern, not an edge case.
pub struct CheckoutExpiredHandler {
    offers: Arc<dyn OfferRepository>,
    notifier: Arc<dyn Notifier>,
}

impl CheckoutExpiredHandler {
    pub fn new(offers: Arc<dyn OfferRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { offers, notifier }
    }
}

#[async_trait]
impl EventHandler for CheckoutExpiredHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::CheckoutSessionExpired]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = CheckoutExpired::decode(event)?;

        let Some(token) = &payload.offer_token else {
            return Err(EngineError::Ignored(format!(
                "Expired checkout {} carries no offer token",
                payload.checkout_ref
            )));
        };
        let Some(mut offer) = self.offers.find_by_token(token).await? else {
            return Err(EngineError::unresolved("offer", token.as_str()));
        };

        if let Err(e) = offer.mark_expired() {
            return Err(EngineError::Ignored(format!(
                "Offer {} not expired: {}",
                token, e
            )));
        }
        self.offers.update(&offer).await?;

        if let Err(e) = self
            .notifier
            .offer_expired(
                &offer.trainer_id,
                &offer.client_email,
                &offer.packages,
                offer.expires_at,
            )
            .await
        {
            tracing::warn!(token = %token, error = %e, "Offer-expired notification failed");
        }

        tracing::info!(token = %token, "Offer expired");
        Ok(())
    }
}

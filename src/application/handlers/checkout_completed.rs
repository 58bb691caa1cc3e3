//! Handler for completed checkout sessions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::delivery_generator::{DeliveryGenerator, PurchasedItem};
use crate::application::engine::EventHandler;
use crate::application::errors::EngineError;
use crate::domain::events::{CheckoutCompleted, ProviderEvent, ProviderEventType};
use crate::domain::foundation::{Timestamp, TrainerId};
use crate::domain::offer::{CheckoutMode, Offer};
use crate::ports::{CatalogReader, OfferRepository, UserDirectory};

/// Generates service deliveries for a completed checkout and advances the
/// funding offer.
///
/// The offer's package summary is the primary item source when a token is
/// present; the checkout's own line items are the fallback. One-time
/// checkouts mark the offer PAID here; subscription-mode checkouts leave
/// offer completion to the subscription-created handler.
pub struct CheckoutCompletedHandler {
    users: Arc<dyn UserDirectory>,
    offers: Arc<dyn OfferRepository>,
    catalog: Arc<dyn CatalogReader>,
    deliveries: Arc<DeliveryGenerator>,
}

impl CheckoutCompletedHandler {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        offers: Arc<dyn OfferRepository>,
        catalog: Arc<dyn CatalogReader>,
        deliveries: Arc<DeliveryGenerator>,
    ) -> Self {
        Self {
            users,
            offers,
            catalog,
            deliveries,
        }
    }

    /// Resolves purchased items from the offer's package summary.
    async fn items_from_offer(&self, offer: &Offer) -> Result<Vec<PurchasedItem>, EngineError> {
        let mut items = Vec::with_capacity(offer.packages.len());
        for line in &offer.packages {
            match self.catalog.find_by_id(&line.package_id).await? {
                Some(package) => items.push(PurchasedItem {
                    package,
                    quantity: line.quantity,
                }),
                None => {
                    tracing::warn!(
                        token = %offer.token,
                        package_id = %line.package_id,
                        "Offer references unknown package, skipping item"
                    );
                }
            }
        }
        Ok(items)
    }

    /// Resolves purchased items from the checkout's line items.
    async fn items_from_line_items(
        &self,
        payload: &CheckoutCompleted,
    ) -> Result<Vec<PurchasedItem>, EngineError> {
        let mut items = Vec::with_capacity(payload.line_items.len());
        for line in &payload.line_items {
            match self.catalog.find_by_price_ref(&line.price_ref).await? {
                Some(package) => items.push(PurchasedItem {
                    package,
                    quantity: line.quantity,
                }),
                None => {
                    tracing::warn!(
                        checkout_ref = %payload.checkout_ref,
                        price_ref = %line.price_ref,
                        "Line item references unknown price, skipping item"
                    );
                }
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl EventHandler for CheckoutCompletedHandler {
    fn handles(&self) -> Vec<ProviderEventType> {
        vec![ProviderEventType::CheckoutSessionCompleted]
    }

    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let payload = CheckoutCompleted::decode(event)?;
        let now = Timestamp::now();

        let Some(customer_ref) = &payload.customer_ref else {
            return Err(EngineError::Ignored(format!(
                "Checkout {} carries no customer reference",
                payload.checkout_ref
            )));
        };
        let Some(user) = self.users.find_by_customer_ref(customer_ref).await? else {
            return Err(EngineError::unresolved("user", customer_ref));
        };

        let offer = match &payload.offer_token {
            Some(token) => self.offers.find_by_token(token).await?,
            None => None,
        };
        if payload.offer_token.is_some() && offer.is_none() {
            tracing::warn!(
                checkout_ref = %payload.checkout_ref,
                "Checkout references unknown offer token, falling back to line items"
            );
        }

        // Offer summary is the primary item source, line items the fallback.
        let (items, trainer_override): (Vec<PurchasedItem>, Option<TrainerId>) = match &offer {
            Some(offer) => (self.items_from_offer(offer).await?, Some(offer.trainer_id)),
            None => (self.items_from_line_items(&payload).await?, None),
        };

        let payment_ref = payload
            .payment_intent_ref
            .clone()
            .unwrap_or_else(|| payload.checkout_ref.clone());

        let metadata = serde_json::json!({
            "checkout_ref": payload.checkout_ref,
            "offer_token": payload.offer_token,
            "mode": payload.mode,
        });
        let created = self
            .deliveries
            .generate(&payment_ref, user.id, trainer_override, &items, metadata, now)
            .await?;

        // One-time checkouts settle the offer here; subscription-mode
        // checkouts settle through the subscription-created handler.
        if payload.mode == "payment" {
            if let Some(mut offer) = offer {
                match offer.mark_paid(
                    payload.checkout_ref.clone(),
                    CheckoutMode::Payment,
                    payload.payment_intent_ref.clone(),
                    now,
                ) {
                    Ok(()) => self.offers.update(&offer).await?,
                    Err(e) => {
                        tracing::info!(token = %offer.token, reason = %e, "Offer not marked paid");
                    }
                }
            }
        }

        tracing::info!(
            checkout_ref = %payload.checkout_ref,
            user_id = %user.id,
            deliveries_created = created,
            "Checkout completed"
        );
        Ok(())
    }
}

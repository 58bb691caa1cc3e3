//! Offer aggregate entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, PackageId, StateMachine, Timestamp, TrainerId};

use super::OfferStatus;

/// Checkout mode the offer was paid through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    Payment,
    Subscription,
}

/// One package line inside an offer's summary. Order is preserved; the
/// summary is the primary item source when the funded checkout completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferItem {
    pub package_id: PackageId,
    pub quantity: u32,
    pub price_ref: String,
}

/// Trainer-issued, time-limited purchase link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// External key; checkout events carry it in their metadata.
    pub token: String,

    pub status: OfferStatus,
    pub trainer_id: TrainerId,
    pub client_email: String,

    /// Ordered package summary.
    pub packages: Vec<OfferItem>,

    pub expires_at: Timestamp,
    pub completed_at: Option<Timestamp>,

    /// Stamped when the offer is paid or completed.
    pub checkout_ref: Option<String>,
    pub payment_ref: Option<String>,
    pub checkout_mode: Option<CheckoutMode>,
}

impl Offer {
    pub fn new(
        token: String,
        trainer_id: TrainerId,
        client_email: String,
        packages: Vec<OfferItem>,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            token,
            status: OfferStatus::Processing,
            trainer_id,
            client_email,
            packages,
            expires_at,
            completed_at: None,
            checkout_ref: None,
            payment_ref: None,
            checkout_mode: None,
        }
    }

    /// Marks the offer paid after its checkout completed with a one-time
    /// payment. Only valid from Processing.
    pub fn mark_paid(
        &mut self,
        checkout_ref: String,
        mode: CheckoutMode,
        payment_ref: Option<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.status = self.status.transition_to(OfferStatus::Paid)?;
        self.checkout_ref = Some(checkout_ref);
        self.checkout_mode = Some(mode);
        self.payment_ref = payment_ref;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Marks the offer completed when it funds a recurring subscription
    /// rather than a one-time payment. Only valid from Processing.
    pub fn mark_completed(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(OfferStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Marks the offer expired after a provider session-expired
    /// notification. Only valid from Processing: a paid offer must never be
    /// flipped to Expired by a late or duplicate expiry event.
    pub fn mark_expired(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(OfferStatus::Expired)?;
        Ok(())
    }
}

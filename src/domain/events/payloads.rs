//! Typed payload decoding for provider events.
//!
//! Each handler-facing payload is decoded exactly once at the boundary.
//! Optional-field re-derivation (is this creation a reactivation? which
//! offer funded this checkout?) happens here and nowhere else, expressed as
//! tagged variants the handlers match on.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::subscription::{InvoicePeriod, TrialWindow};
use crate::domain::foundation::Timestamp;

use super::ProviderEvent;

/// Errors raised while decoding an event payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Required field missing from the payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Payload did not match the expected object shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Parse(err.to_string())
    }
}

/// How a subscription-created event came to be, decided once at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOrigin {
    /// A brand-new subscription.
    Fresh,

    /// The user resubscribed; the prior record must be force-cancelled
    /// before the new one is created.
    Reactivation {
        prior_subscription_ref: String,
    },
}

// ── Raw provider object shapes ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSubscription {
    id: String,
    customer: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    current_period_start: Option<i64>,
    #[serde(default)]
    current_period_end: Option<i64>,
    #[serde(default)]
    trial_start: Option<i64>,
    #[serde(default)]
    trial_end: Option<i64>,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    items: Option<RawItemList>,
}

#[derive(Debug, Deserialize)]
struct RawItemList {
    #[serde(default)]
    data: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    price: RawPrice,
    #[serde(default)]
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawInvoice {
    id: String,
    #[serde(default)]
    subscription: Option<String>,
    #[serde(default)]
    payment_intent: Option<String>,
    #[serde(default)]
    billing_reason: Option<String>,
    #[serde(default)]
    amount_paid: Option<i64>,
    #[serde(default)]
    period_start: Option<i64>,
    #[serde(default)]
    period_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawCheckoutSession {
    id: String,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    payment_intent: Option<String>,
    #[serde(default)]
    subscription: Option<String>,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    line_items: Option<RawItemList>,
}

#[derive(Debug, Deserialize)]
struct RawCustomer {
    id: String,
}

fn metadata_str(
    metadata: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    metadata
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

// ── Typed payloads ──────────────────────────────────────────────────────

/// Decoded `subscription.created` payload.
#[derive(Debug, Clone)]
pub struct SubscriptionCreated {
    pub subscription_ref: String,
    pub customer_ref: String,
    pub price_ref: String,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub trial: Option<TrialWindow>,
    pub origin: CreationOrigin,
    pub offer_token: Option<String>,
}

impl SubscriptionCreated {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawSubscription = event.deserialize_object()?;

        let price_ref = raw
            .items
            .as_ref()
            .and_then(|items| items.data.first())
            .map(|item| item.price.id.clone())
            .ok_or(DecodeError::MissingField("items.data[0].price"))?;

        let period_start = raw
            .current_period_start
            .map(Timestamp::from_unix_secs)
            .unwrap_or_else(|| Timestamp::from_unix_secs(event.created));
        let period_end = raw
            .current_period_end
            .map(Timestamp::from_unix_secs)
            .ok_or(DecodeError::MissingField("current_period_end"))?;

        let trial = match (raw.trial_start, raw.trial_end) {
            (Some(start), Some(end)) => Some(TrialWindow {
                start: Timestamp::from_unix_secs(start),
                end: Timestamp::from_unix_secs(end),
            }),
            _ => None,
        };

        let origin = match metadata_str(&raw.metadata, "reactivation_of") {
            Some(prior) => CreationOrigin::Reactivation {
                prior_subscription_ref: prior,
            },
            None => CreationOrigin::Fresh,
        };

        Ok(Self {
            subscription_ref: raw.id,
            customer_ref: raw.customer,
            price_ref,
            period_start,
            period_end,
            trial,
            origin,
            offer_token: metadata_str(&raw.metadata, "offer_token"),
        })
    }
}

/// Decoded `subscription.updated` payload.
#[derive(Debug, Clone)]
pub struct SubscriptionUpdated {
    pub subscription_ref: String,
    pub provider_status: String,
    pub price_ref: Option<String>,
    pub period_end: Option<Timestamp>,
}

impl SubscriptionUpdated {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawSubscription = event.deserialize_object()?;
        Ok(Self {
            subscription_ref: raw.id,
            provider_status: raw.status.unwrap_or_default(),
            price_ref: raw
                .items
                .as_ref()
                .and_then(|items| items.data.first())
                .map(|item| item.price.id.clone()),
            period_end: raw.current_period_end.map(Timestamp::from_unix_secs),
        })
    }
}

/// Decoded `subscription.deleted` payload.
#[derive(Debug, Clone)]
pub struct SubscriptionDeleted {
    pub subscription_ref: String,
}

impl SubscriptionDeleted {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawSubscription = event.deserialize_object()?;
        Ok(Self {
            subscription_ref: raw.id,
        })
    }
}

/// Decoded invoice payload, shared by the payment succeeded/failed events.
#[derive(Debug, Clone)]
pub struct InvoiceEvent {
    pub invoice_ref: String,
    pub subscription_ref: Option<String>,
    pub payment_intent_ref: Option<String>,
    pub billing_reason: Option<String>,
    pub amount_paid: i64,
    pub period: Option<InvoicePeriod>,
}

impl InvoiceEvent {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawInvoice = event.deserialize_object()?;

        let period = match (raw.period_start, raw.period_end) {
            (Some(start), Some(end)) => Some(InvoicePeriod {
                start: Timestamp::from_unix_secs(start),
                end: Timestamp::from_unix_secs(end),
            }),
            _ => None,
        };

        Ok(Self {
            invoice_ref: raw.id,
            subscription_ref: raw.subscription,
            payment_intent_ref: raw.payment_intent,
            billing_reason: raw.billing_reason,
            amount_paid: raw.amount_paid.unwrap_or(0),
            period,
        })
    }

    /// True for the invoice generated by initial subscription creation,
    /// whose monetary side effects are covered by checkout completion.
    pub fn is_subscription_create(&self) -> bool {
        self.billing_reason.as_deref() == Some("subscription_create")
    }
}

/// One purchasable line inside a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    pub price_ref: String,
    pub quantity: u32,
}

/// Decoded `checkout.session.completed` payload.
#[derive(Debug, Clone)]
pub struct CheckoutCompleted {
    pub checkout_ref: String,
    pub customer_ref: Option<String>,
    /// "payment" for one-time purchases, "subscription" for recurring.
    pub mode: String,
    pub payment_intent_ref: Option<String>,
    pub subscription_ref: Option<String>,
    pub offer_token: Option<String>,
    pub line_items: Vec<CheckoutLineItem>,
}

impl CheckoutCompleted {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawCheckoutSession = event.deserialize_object()?;

        let line_items = raw
            .line_items
            .map(|items| {
                items
                    .data
                    .into_iter()
                    .map(|item| CheckoutLineItem {
                        price_ref: item.price.id,
                        quantity: item.quantity.unwrap_or(1),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            checkout_ref: raw.id,
            customer_ref: raw.customer,
            mode: raw.mode.unwrap_or_else(|| "payment".to_string()),
            payment_intent_ref: raw.payment_intent,
            subscription_ref: raw.subscription,
            offer_token: metadata_str(&raw.metadata, "offer_token"),
            line_items,
        })
    }
}

/// Decoded `checkout.session.expired` payload.
#[derive(Debug, Clone)]
pub struct CheckoutExpired {
    pub checkout_ref: String,
    pub offer_token: Option<String>,
}

impl CheckoutExpired {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawCheckoutSession = event.deserialize_object()?;
        Ok(Self {
            checkout_ref: raw.id,
            offer_token: metadata_str(&raw.metadata, "offer_token"),
        })
    }
}

/// Decoded `customer.subscription.trial_will_end` payload.
#[derive(Debug, Clone)]
pub struct TrialWillEnd {
    pub subscription_ref: String,
    pub trial_end: Option<Timestamp>,
}

impl TrialWillEnd {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawSubscription = event.deserialize_object()?;
        Ok(Self {
            subscription_ref: raw.id,
            trial_end: raw.trial_end.map(Timestamp::from_unix_secs),
        })
    }
}

/// Decoded `customer.deleted` payload.
#[derive(Debug, Clone)]
pub struct CustomerDeleted {
    pub customer_ref: String,
}

impl CustomerDeleted {
    pub fn decode(event: &ProviderEvent) -> Result<Self, DecodeError> {
        let raw: RawCustomer = event.deserialize_object()?;
        Ok(Self {
            customer_ref: raw.id,
        })
    }
}

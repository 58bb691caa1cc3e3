//! Provider webhook event envelope.
//!
//! Only fields relevant to reconciliation are captured; the rest of the
//! provider's event schema is ignored.

use serde::{Deserialize, Serialize};

/// Inbound provider notification (simplified envelope).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Declared type string (e.g. "invoice.payment_failed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: ProviderEventData,

    /// Whether this is a live mode event.
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEventData {
    /// The object that triggered the event (polymorphic per event type).
    pub object: serde_json::Value,
}

impl ProviderEvent {
    /// Parse the declared type into a known enum variant.
    pub fn parsed_type(&self) -> ProviderEventType {
        ProviderEventType::from_type_str(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Stable deduplication key for this notification.
    ///
    /// The provider event id is the key; when the envelope carries none
    /// (seen from some relay tooling) the key falls back to the declared
    /// type plus the payload object id, so replays of the same logical
    /// notification still collide.
    pub fn dedup_key(&self) -> String {
        if !self.id.is_empty() {
            return self.id.clone();
        }
        let object_id = self
            .data
            .object
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        format!("{}:{}", self.event_type, object_id)
    }
}

/// Provider event types this engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventType {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    CheckoutSessionCompleted,
    CheckoutSessionExpired,
    TrialWillEnd,
    CustomerDeleted,
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    /// Unknown or unhandled event type.
    Unknown,
}

impl ProviderEventType {
    /// Parse event type from the declared string.
    pub fn from_type_str(s: &str) -> Self {
        match s {
            "customer.subscription.created" | "subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" | "subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" | "subscription.deleted" => Self::SubscriptionDeleted,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "checkout.session.expired" => Self::CheckoutSessionExpired,
            "customer.subscription.trial_will_end" => Self::TrialWillEnd,
            "customer.deleted" => Self::CustomerDeleted,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.failed" => Self::PaymentIntentFailed,
            _ => Self::Unknown,
        }
    }

    /// Canonical provider type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CheckoutSessionExpired => "checkout.session.expired",
            Self::TrialWillEnd => "customer.subscription.trial_will_end",
            Self::CustomerDeleted => "customer.deleted",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.failed",
            Self::Unknown => "unknown",
        }
    }
}

/// Builder for creating test ProviderEvent instances.
#[cfg(test)]
pub struct ProviderEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for ProviderEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl ProviderEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> ProviderEvent {
        ProviderEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: ProviderEventData { object: self.object },
            livemode: self.livemode,
        }
    }
}

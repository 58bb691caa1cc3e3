//! Provider notification events.
//!
//! The envelope and the typed payloads this engine consumes. Payloads are
//! decoded once at the boundary into tagged types (e.g. fresh creation vs.
//! reactivation) so handlers never re-derive state from optional fields.

mod payloads;
mod provider_event;

pub use payloads::{
    CheckoutCompleted, CheckoutExpired, CheckoutLineItem, CreationOrigin, CustomerDeleted,
    DecodeError, InvoiceEvent, SubscriptionCreated, SubscriptionDeleted, SubscriptionUpdated,
    TrialWillEnd,
};
pub use provider_event::{ProviderEvent, ProviderEventData, ProviderEventType};

#[cfg(test)]
pub use provider_event::ProviderEventBuilder;

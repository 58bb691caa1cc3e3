//! Subscription domain module.
//!
//! Owns the lifecycle of a single subscription record: status machine,
//! trial window, grace period and retry counter, and the pause marker used
//! by the coaching/yearly coupling rule.

mod aggregate;
mod dunning;
mod status;

pub use aggregate::{InvoicePeriod, PauseMarker, Subscription, TrialWindow};
pub use dunning::{DunningAssessment, DunningPolicy};
pub use status::SubscriptionStatus;

//! Service delivery domain module.
//!
//! One ServiceDelivery per successful monetary transaction, with its
//! generated fulfillment task set. The provider payment reference is the
//! uniqueness key: re-delivered events must never produce a second delivery
//! for the same reference.

mod delivery;
mod task;

pub use delivery::{DeliveryStatus, ServiceDelivery};
pub use task::{ServiceTask, TaskBlueprint, TaskStatus};

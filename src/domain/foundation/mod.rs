//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the reconciliation domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{DeliveryId, PackageId, SubscriptionId, TaskId, TrainerId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

//! Application layer: the reconciliation engine, its handlers, and the
//! cross-entity controllers they share.

pub mod coupling;
pub mod delivery_generator;
pub mod engine;
pub mod errors;
pub mod handlers;

pub use coupling::CouplingController;
pub use delivery_generator::{DeliveryGenerator, PurchasedItem};
pub use engine::{EngineOutcome, EventHandler, HandlerRegistry, ReconciliationEngine};
pub use errors::EngineError;

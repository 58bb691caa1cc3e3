//! Offer domain module.
//!
//! Trainer-issued, tokenized, time-limited purchase links. Status moves in
//! one direction only; Processing is the sole state transitions are allowed
//! from, which is what protects paid offers from late expiry events.

mod offer;
mod status;

pub use offer::{CheckoutMode, Offer, OfferItem};
pub use status::OfferStatus;

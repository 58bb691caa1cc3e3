//! TrainForge Billing - Payment provider reconciliation engine.
//!
//! Keeps local subscription, service-delivery and offer records consistent
//! with the authoritative state held by the payment provider, which
//! communicates exclusively through asynchronous, at-least-once, potentially
//! out-of-order event notifications.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Processed-event ledger port.
//!
//! Enables idempotent event handling by tracking which provider events have
//! already been dispatched, with the full payload and result kept for
//! auditing.
//!
//! ## Why event idempotency matters
//!
//! The provider may deliver the same event multiple times:
//! - network timeouts
//! - a non-2xx response from our endpoint (triggers retry)
//! - our endpoint acknowledging but the provider not receiving it
//!
//! All event handlers MUST be idempotent.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};

/// Record of a processed provider event.
#[derive(Debug, Clone)]
pub struct ProcessedEventRecord {
    /// Deduplication key (provider event id, or a derived fallback).
    pub event_id: String,

    /// Declared provider event type.
    pub event_type: String,

    /// When the event was processed.
    pub processed_at: Timestamp,

    /// Result of processing: "success", "ignored", or "failed".
    pub result: String,

    /// Reason or error message for ignored/failed results.
    pub error_message: Option<String>,

    /// Original event payload for debugging.
    pub payload: serde_json::Value,
}

impl ProcessedEventRecord {
    /// Creates a new success record.
    pub fn success(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Timestamp::now(),
            result: "success".to_string(),
            error_message: None,
            payload,
        }
    }

    /// Creates a new ignored record.
    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Timestamp::now(),
            result: "ignored".to_string(),
            error_message: Some(reason.into()),
            payload,
        }
    }

    /// Creates a new failure record.
    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Timestamp::now(),
            result: "failed".to_string(),
            error_message: Some(error.into()),
            payload,
        }
    }
}

/// Result of attempting to save a processed-event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this event).
    Inserted,
    /// Record already exists (duplicate event).
    AlreadyExists,
}

/// Port for the processed-event ledger.
///
/// Implementations should use database constraints (PRIMARY KEY on
/// event_id) to prevent race conditions during concurrent processing.
#[async_trait]
pub trait ProcessedEventRepository: Send + Sync {
    /// Find a previously processed event by its deduplication key.
    ///
    /// Returns `None` if the event hasn't been processed yet.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<ProcessedEventRecord>, DomainError>;

    /// Attempt to save a processed-event record.
    ///
    /// Uses `ON CONFLICT DO NOTHING` semantics: returns
    /// `SaveResult::Inserted` if this is the first record for the key, or
    /// `SaveResult::AlreadyExists` if another writer got there first.
    async fn save(&self, record: ProcessedEventRecord) -> Result<SaveResult, DomainError>;

    /// Delete records processed before the given timestamp.
    ///
    /// Returns the number of records deleted. Used for the retention policy
    /// (e.g. keep 30 days).
    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}

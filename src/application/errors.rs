//! Application-level error taxonomy for event handling.
//!
//! Handlers classify failures so the engine can decide what to record and
//! whether the event still gets acknowledged:
//!
//! - `Ignored` and `Unresolved` are logged and dropped. The provider does
//!   not re-send creation-class events on failure, and updates for unknown
//!   records are not recoverable locally, so retrying would not help.
//! - `InvalidTransition` is a stale or duplicate notification arriving
//!   against a record that already moved on; a no-op by policy.
//! - `Storage` is the only class that represents real breakage.

use thiserror::Error;

use crate::domain::events::DecodeError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ProviderCallError;

/// Errors surfaced by event handlers to the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Event acknowledged but deliberately not processed.
    #[error("Ignored: {0}")]
    Ignored(String),

    /// A referenced user, package, subscription, or offer could not be
    /// found locally.
    #[error("Unresolved {kind} reference: {reference}")]
    Unresolved {
        kind: &'static str,
        reference: String,
    },

    /// The target record is not in the required source state.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Payload did not decode into the expected shape.
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Persistence failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn unresolved(kind: &'static str, reference: impl Into<String>) -> Self {
        EngineError::Unresolved {
            kind,
            reference: reference.into(),
        }
    }

    /// Whether this error is dropped by policy rather than recorded as a
    /// processing failure.
    pub fn is_dropped(&self) -> bool {
        matches!(
            self,
            EngineError::Ignored(_)
                | EngineError::Unresolved { .. }
                | EngineError::InvalidTransition(_)
        )
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => EngineError::InvalidTransition(err.message),
            ErrorCode::StorageError => EngineError::Storage(err.message),
            _ => EngineError::Storage(err.to_string()),
        }
    }
}

impl From<ProviderCallError> for EngineError {
    fn from(err: ProviderCallError) -> Self {
        DomainError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_classes() {
        assert!(EngineError::Ignored("dup".into()).is_dropped());
        assert!(EngineError::unresolved("user", "cus_1").is_dropped());
        assert!(EngineError::InvalidTransition("paid offer".into()).is_dropped());
        assert!(!EngineError::Storage("down".into()).is_dropped());
    }

    #[test]
    fn domain_transition_error_maps_to_invalid_transition() {
        let err: EngineError = DomainError::invalid_transition("cancelled is terminal").into();
        assert!(matches!(err, EngineError::InvalidTransition(_)));
    }

    #[test]
    fn domain_storage_error_maps_to_storage() {
        let err: EngineError = DomainError::storage("connection lost").into();
        assert!(matches!(err, EngineError::Storage(_)));
    }
}

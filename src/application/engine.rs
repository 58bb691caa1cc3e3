//! Reconciliation engine: the single entry point for provider events.
//!
//! Coordinates the processed-event ledger and the per-type handlers so each
//! event is applied at most once.
//!
//! ## Processing steps
//!
//! 1. Check the ledger for the event's deduplication key (idempotency)
//! 2. Dispatch to the handler registered for the event type
//! 3. Record the result (success, ignored, or failed)
//!
//! ## Acknowledgment posture
//!
//! Every event is acknowledged after an attempt, including failures: the
//! outcome is returned as a value, never as an error. Provider redelivery
//! windows span hours, and duplicate side effects (duplicate emails,
//! duplicate deliveries) are worse than a rare lost update, so recovery
//! relies on idempotent replay rather than redelivery. Only a ledger
//! storage failure propagates as an error.
//!
//! ## Race condition handling
//!
//! When duplicate deliveries arrive simultaneously, the first ledger save
//! wins (PRIMARY KEY constraint); the others see `AlreadyExists` and report
//! `AlreadyProcessed`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::events::{ProviderEvent, ProviderEventType};
use crate::domain::foundation::DomainError;
use crate::ports::{ProcessedEventRecord, ProcessedEventRepository, SaveResult};

use super::errors::EngineError;

/// Handler for one or more provider event types.
///
/// Implementations should be stateless and re-read current state on every
/// invocation; no handler may assume it is the first or only delivery of a
/// given logical event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// The event type(s) this handler processes.
    fn handles(&self) -> Vec<ProviderEventType>;

    /// Handles the event.
    ///
    /// Returns `Ok(())` on success, `Err(EngineError::Ignored(_))` (or
    /// another dropped class) when the event should be acknowledged without
    /// effect, and other `Err` variants for actual failures.
    async fn handle(&self, event: &ProviderEvent) -> Result<(), EngineError>;
}

/// Maps event types to their registered handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<ProviderEventType, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for every type it declares.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        for event_type in handler.handles() {
            self.handlers.insert(event_type, Arc::clone(&handler));
        }
    }

    /// Find the handler for the given event type.
    pub fn get(&self, event_type: &ProviderEventType) -> Option<&Arc<dyn EventHandler>> {
        self.handlers.get(event_type)
    }

    /// Dispatch an event to its handler.
    ///
    /// Unregistered types (including the payment-intent notifications,
    /// whose side effects are covered by checkout completion) come back as
    /// `Ignored`.
    pub async fn dispatch(&self, event: &ProviderEvent) -> Result<(), EngineError> {
        let event_type = event.parsed_type();
        match self.get(&event_type) {
            Some(handler) => handler.handle(event).await,
            None => Err(EngineError::Ignored(format!(
                "No handler for event type: {:?}",
                event_type
            ))),
        }
    }
}

/// Outcome of processing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutcome {
    /// Handler ran and committed its state transition.
    Processed,
    /// Event acknowledged without effect (no handler, unresolved
    /// reference, or stale transition).
    Ignored,
    /// Handler failed; the failure is recorded and the event acknowledged.
    Failed,
    /// This deduplication key was already processed.
    AlreadyProcessed,
}

/// Processes provider events with idempotency guarantees.
pub struct ReconciliationEngine<R: ProcessedEventRepository> {
    ledger: R,
    registry: HandlerRegistry,
}

impl<R: ProcessedEventRepository> ReconciliationEngine<R> {
    pub fn new(ledger: R, registry: HandlerRegistry) -> Self {
        Self { ledger, registry }
    }

    /// Process a provider event at most once.
    ///
    /// # Errors
    ///
    /// Only ledger storage failures are returned as errors; handler
    /// failures are reported through [`EngineOutcome::Failed`].
    pub async fn process(&self, event: ProviderEvent) -> Result<EngineOutcome, DomainError> {
        let key = event.dedup_key();

        if self.ledger.find_by_event_id(&key).await?.is_some() {
            tracing::debug!(event_id = %key, "Duplicate event, skipping");
            return Ok(EngineOutcome::AlreadyProcessed);
        }

        let result = self.registry.dispatch(&event).await;

        let payload = serde_json::to_value(&event).unwrap_or(serde_json::Value::Null);
        let (record, outcome) = match &result {
            Ok(()) => (
                ProcessedEventRecord::success(&key, &event.event_type, payload),
                EngineOutcome::Processed,
            ),
            Err(e) if e.is_dropped() => {
                tracing::info!(
                    event_id = %key,
                    event_type = %event.event_type,
                    reason = %e,
                    "Event acknowledged without effect"
                );
                (
                    ProcessedEventRecord::ignored(&key, &event.event_type, e.to_string(), payload),
                    EngineOutcome::Ignored,
                )
            }
            Err(e) => {
                tracing::error!(
                    event_id = %key,
                    event_type = %event.event_type,
                    error = %e,
                    "Event handler failed"
                );
                (
                    ProcessedEventRecord::failed(&key, &event.event_type, e.to_string(), payload),
                    EngineOutcome::Failed,
                )
            }
        };

        match self.ledger.save(record).await? {
            SaveResult::Inserted => Ok(outcome),
            // Lost the race, another delivery already handled it
            SaveResult::AlreadyExists => Ok(EngineOutcome::AlreadyProcessed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::ProviderEventBuilder;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::RwLock;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    struct MockLedger {
        records: RwLock<HashMap<String, ProcessedEventRecord>>,
    }

    impl MockLedger {
        fn new() -> Self {
            Self {
                records: RwLock::new(HashMap::new()),
            }
        }

        async fn result_for(&self, event_id: &str) -> Option<String> {
            self.records
                .read()
                .await
                .get(event_id)
                .map(|r| r.result.clone())
        }
    }

    #[async_trait]
    impl ProcessedEventRepository for MockLedger {
        async fn find_by_event_id(
            &self,
            event_id: &str,
        ) -> Result<Option<ProcessedEventRecord>, DomainError> {
            Ok(self.records.read().await.get(event_id).cloned())
        }

        async fn save(&self, record: ProcessedEventRecord) -> Result<SaveResult, DomainError> {
            let mut records = self.records.write().await;
            if records.contains_key(&record.event_id) {
                Ok(SaveResult::AlreadyExists)
            } else {
                records.insert(record.event_id.clone(), record);
                Ok(SaveResult::Inserted)
            }
        }

        async fn delete_before(
            &self,
            cutoff: crate::domain::foundation::Timestamp,
        ) -> Result<u64, DomainError> {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|_, r| !r.processed_at.is_before(&cutoff));
            Ok((before - records.len()) as u64)
        }
    }

    enum MockBehavior {
        Succeed,
        Ignore,
        Fail,
    }

    struct MockHandler {
        handles_types: Vec<ProviderEventType>,
        call_count: AtomicU32,
        behavior: MockBehavior,
    }

    impl MockHandler {
        fn new(handles: Vec<ProviderEventType>) -> Self {
            Self {
                handles_types: handles,
                call_count: AtomicU32::new(0),
                behavior: MockBehavior::Succeed,
            }
        }

        fn failing(handles: Vec<ProviderEventType>) -> Self {
            Self {
                behavior: MockBehavior::Fail,
                ..Self::new(handles)
            }
        }

        fn ignoring(handles: Vec<ProviderEventType>) -> Self {
            Self {
                behavior: MockBehavior::Ignore,
                ..Self::new(handles)
            }
        }

        fn call_count(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventHandler for MockHandler {
        fn handles(&self) -> Vec<ProviderEventType> {
            self.handles_types.clone()
        }

        async fn handle(&self, _event: &ProviderEvent) -> Result<(), EngineError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                MockBehavior::Succeed => Ok(()),
                MockBehavior::Ignore => Err(EngineError::Ignored("Test ignore".to_string())),
                MockBehavior::Fail => Err(EngineError::Storage("Simulated failure".to_string())),
            }
        }
    }

    fn engine_with(
        handler: Arc<MockHandler>,
    ) -> (ReconciliationEngine<Arc<MockLedger>>, Arc<MockLedger>) {
        let ledger = Arc::new(MockLedger::new());
        let mut registry = HandlerRegistry::new();
        registry.register(handler);
        (
            ReconciliationEngine::new(Arc::clone(&ledger), registry),
            ledger,
        )
    }

    #[async_trait]
    impl ProcessedEventRepository for Arc<MockLedger> {
        async fn find_by_event_id(
            &self,
            event_id: &str,
        ) -> Result<Option<ProcessedEventRecord>, DomainError> {
            self.as_ref().find_by_event_id(event_id).await
        }

        async fn save(&self, record: ProcessedEventRecord) -> Result<SaveResult, DomainError> {
            self.as_ref().save(record).await
        }

        async fn delete_before(
            &self,
            cutoff: crate::domain::foundation::Timestamp,
        ) -> Result<u64, DomainError> {
            self.as_ref().delete_before(cutoff).await
        }
    }

    // ══════════════════════════════════════════════════════════════
    // HandlerRegistry Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn registry_finds_handler_for_registered_type() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let mut registry = HandlerRegistry::new();
        registry.register(handler);

        assert!(registry
            .get(&ProviderEventType::CheckoutSessionCompleted)
            .is_some());
        assert!(registry
            .get(&ProviderEventType::InvoicePaymentFailed)
            .is_none());
    }

    #[test]
    fn registry_registers_handler_for_all_declared_types() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::InvoicePaymentSucceeded,
            ProviderEventType::InvoicePaymentFailed,
        ]));
        let mut registry = HandlerRegistry::new();
        registry.register(handler);

        assert!(registry
            .get(&ProviderEventType::InvoicePaymentSucceeded)
            .is_some());
        assert!(registry
            .get(&ProviderEventType::InvoicePaymentFailed)
            .is_some());
    }

    #[tokio::test]
    async fn dispatch_without_handler_is_ignored() {
        let registry = HandlerRegistry::new();
        let event = ProviderEventBuilder::new()
            .event_type("payment_intent.succeeded")
            .build();

        let result = registry.dispatch(&event).await;

        assert!(matches!(result, Err(EngineError::Ignored(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // ReconciliationEngine Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn processes_new_event_successfully() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, ledger) = engine_with(handler.clone());

        let event = ProviderEventBuilder::new().id("evt_new").build();
        let outcome = engine.process(event).await.unwrap();

        assert_eq!(outcome, EngineOutcome::Processed);
        assert_eq!(handler.call_count(), 1);
        assert_eq!(ledger.result_for("evt_new").await.as_deref(), Some("success"));
    }

    #[tokio::test]
    async fn duplicate_event_is_skipped() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, _ledger) = engine_with(handler.clone());

        let first = ProviderEventBuilder::new().id("evt_dup").build();
        engine.process(first).await.unwrap();

        let second = ProviderEventBuilder::new().id("evt_dup").build();
        let outcome = engine.process(second).await.unwrap();

        assert_eq!(outcome, EngineOutcome::AlreadyProcessed);
        assert_eq!(handler.call_count(), 1);
    }

    #[tokio::test]
    async fn handler_failure_is_acknowledged_and_recorded() {
        let handler = Arc::new(MockHandler::failing(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, ledger) = engine_with(handler);

        let event = ProviderEventBuilder::new().id("evt_fail").build();
        let outcome = engine.process(event).await.unwrap();

        assert_eq!(outcome, EngineOutcome::Failed);
        assert_eq!(ledger.result_for("evt_fail").await.as_deref(), Some("failed"));
    }

    #[tokio::test]
    async fn ignored_event_is_recorded_as_ignored() {
        let handler = Arc::new(MockHandler::ignoring(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, ledger) = engine_with(handler);

        let event = ProviderEventBuilder::new().id("evt_ignore").build();
        let outcome = engine.process(event).await.unwrap();

        assert_eq!(outcome, EngineOutcome::Ignored);
        assert_eq!(
            ledger.result_for("evt_ignore").await.as_deref(),
            Some("ignored")
        );
    }

    #[tokio::test]
    async fn unregistered_event_type_is_ignored_not_failed() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, _ledger) = engine_with(handler.clone());

        let event = ProviderEventBuilder::new()
            .id("evt_no_handler")
            .event_type("invoice.payment_failed")
            .build();
        let outcome = engine.process(event).await.unwrap();

        assert_eq!(outcome, EngineOutcome::Ignored);
        assert_eq!(handler.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_event_replay_is_skipped_once_recorded() {
        // Failures still acknowledge; a redelivery of the same event must
        // not re-run the handler.
        let handler = Arc::new(MockHandler::failing(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, _ledger) = engine_with(handler.clone());

        let first = ProviderEventBuilder::new().id("evt_once").build();
        engine.process(first).await.unwrap();

        let replay = ProviderEventBuilder::new().id("evt_once").build();
        let outcome = engine.process(replay).await.unwrap();

        assert_eq!(outcome, EngineOutcome::AlreadyProcessed);
        assert_eq!(handler.call_count(), 1);
    }

    #[tokio::test]
    async fn different_events_processed_independently() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::CheckoutSessionCompleted,
            ProviderEventType::InvoicePaymentSucceeded,
        ]));
        let (engine, _ledger) = engine_with(handler.clone());

        let event1 = ProviderEventBuilder::new().id("evt_1").build();
        let event2 = ProviderEventBuilder::new()
            .id("evt_2")
            .event_type("invoice.payment_succeeded")
            .build();

        assert_eq!(
            engine.process(event1).await.unwrap(),
            EngineOutcome::Processed
        );
        assert_eq!(
            engine.process(event2).await.unwrap(),
            EngineOutcome::Processed
        );
        assert_eq!(handler.call_count(), 2);
    }

    #[tokio::test]
    async fn missing_event_id_dedupes_on_derived_key() {
        let handler = Arc::new(MockHandler::new(vec![
            ProviderEventType::CheckoutSessionCompleted,
        ]));
        let (engine, _ledger) = engine_with(handler.clone());

        let object = serde_json::json!({"id": "cs_77"});
        let first = ProviderEventBuilder::new().id("").object(object.clone()).build();
        let second = ProviderEventBuilder::new().id("").object(object).build();

        engine.process(first).await.unwrap();
        let outcome = engine.process(second).await.unwrap();

        assert_eq!(outcome, EngineOutcome::AlreadyProcessed);
        assert_eq!(handler.call_count(), 1);
    }
}

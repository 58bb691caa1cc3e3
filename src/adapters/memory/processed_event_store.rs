//! In-memory processed-event ledger.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{ProcessedEventRecord, ProcessedEventRepository, SaveResult};

/// First save wins, mirroring the PRIMARY KEY constraint the database
/// adapter relies on.
#[derive(Default, Clone)]
pub struct InMemoryProcessedEventRepository {
    records: Arc<RwLock<HashMap<String, ProcessedEventRecord>>>,
}

impl InMemoryProcessedEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded result string for a key, for test assertions.
    pub async fn result_for(&self, event_id: &str) -> Option<String> {
        self.records
            .read()
            .await
            .get(event_id)
            .map(|r| r.result.clone())
    }
}

#[async_trait]
impl ProcessedEventRepository for InMemoryProcessedEventRepository {
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

    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !r.processed_at.is_before(&cutoff));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_save_wins() {
        let repo = InMemoryProcessedEventRepository::new();
        let first = ProcessedEventRecord::success("evt_1", "type", serde_json::json!({}));
        let second = ProcessedEventRecord::failed("evt_1", "type", "late", serde_json::json!({}));

        assert_eq!(repo.save(first).await.unwrap(), SaveResult::Inserted);
        assert_eq!(repo.save(second).await.unwrap(), SaveResult::AlreadyExists);
        assert_eq!(repo.result_for("evt_1").await.as_deref(), Some("success"));
    }

    #[tokio::test]
    async fn delete_before_removes_only_old_records() {
        let repo = InMemoryProcessedEventRepository::new();
        let mut old = ProcessedEventRecord::success("evt_old", "type", serde_json::json!({}));
        old.processed_at = Timestamp::now().add_days(-60);
        let fresh = ProcessedEventRecord::success("evt_fresh", "type", serde_json::json!({}));

        repo.save(old).await.unwrap();
        repo.save(fresh).await.unwrap();

        let deleted = repo.delete_before(Timestamp::now().add_days(-30)).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(repo.find_by_event_id("evt_old").await.unwrap().is_none());
        assert!(repo.find_by_event_id("evt_fresh").await.unwrap().is_some());
    }
}

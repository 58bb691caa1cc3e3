//! In-memory delivery repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::delivery::{ServiceDelivery, ServiceTask};
use crate::domain::foundation::DomainError;
use crate::ports::{DeliveryRepository, InsertOutcome};

/// Keyed by payment reference, mirroring the database unique constraint.
#[derive(Default)]
pub struct InMemoryDeliveryRepository {
    records: RwLock<HashMap<String, (ServiceDelivery, Vec<ServiceTask>)>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored deliveries, for test assertions.
    pub async fn all(&self) -> Vec<ServiceDelivery> {
        self.records
            .read()
            .await
            .values()
            .map(|(delivery, _)| delivery.clone())
            .collect()
    }

    /// Tasks stored with the delivery for a payment reference.
    pub async fn tasks_for(&self, payment_ref: &str) -> Vec<ServiceTask> {
        self.records
            .read()
            .await
            .get(payment_ref)
            .map(|(_, tasks)| tasks.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn insert_with_tasks(
        &self,
        delivery: &ServiceDelivery,
        tasks: &[ServiceTask],
    ) -> Result<InsertOutcome, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&delivery.payment_ref) {
            return Ok(InsertOutcome::DuplicateReference);
        }
        records.insert(
            delivery.payment_ref.clone(),
            (delivery.clone(), tasks.to_vec()),
        );
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_payment_ref(
        &self,
        payment_ref: &str,
    ) -> Result<Option<ServiceDelivery>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .get(payment_ref)
            .map(|(delivery, _)| delivery.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ServiceType;
    use crate::domain::delivery::TaskBlueprint;
    use crate::domain::foundation::{Timestamp, TrainerId, UserId};

    fn delivery(payment_ref: &str) -> ServiceDelivery {
        ServiceDelivery::new(
            payment_ref.to_string(),
            TrainerId::new(),
            UserId::new(),
            ServiceType::PersonalTraining,
            "10x Personal Training".to_string(),
            10,
            serde_json::json!({}),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn insert_stores_delivery_and_tasks() {
        let repo = InMemoryDeliveryRepository::new();
        let d = delivery("pi_1");
        let task = ServiceTask::from_blueprint(
            d.id,
            &TaskBlueprint {
                title: "Kickoff call".to_string(),
                sequence: 1,
            },
        );

        let outcome = repo.insert_with_tasks(&d, &[task]).await.unwrap();

        assert_eq!(outcome, InsertOutcome::Inserted);
        assert!(repo.find_by_payment_ref("pi_1").await.unwrap().is_some());
        assert_eq!(repo.tasks_for("pi_1").await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_reference_writes_nothing() {
        let repo = InMemoryDeliveryRepository::new();
        let first = delivery("pi_dup");
        let second = delivery("pi_dup");

        repo.insert_with_tasks(&first, &[]).await.unwrap();
        let outcome = repo.insert_with_tasks(&second, &[]).await.unwrap();

        assert_eq!(outcome, InsertOutcome::DuplicateReference);
        let stored = repo.find_by_payment_ref("pi_dup").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }
}

//! Service delivery entity.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::ServiceType;
use crate::domain::foundation::{DeliveryId, Timestamp, TrainerId, UserId};

/// Fulfillment status of a delivery.
///
/// Created Pending; advanced by the fulfillment workflow, which is outside
/// this engine. The engine never mutates a delivery after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// One unit of fulfillment owed to a client by a trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDelivery {
    pub id: DeliveryId,

    /// Provider payment reference (payment-intent or invoice id). Unique;
    /// the idempotency key for delivery generation.
    pub payment_ref: String,

    pub trainer_id: TrainerId,
    pub client_id: UserId,
    pub service_type: ServiceType,

    /// Package name at time of purchase; recurring coaching deliveries are
    /// billing-period-named.
    pub package_name: String,

    pub quantity: u32,
    pub status: DeliveryStatus,

    /// Free-form transaction provenance (checkout id, offer token, invoice
    /// billing reason).
    pub metadata: serde_json::Value,

    pub created_at: Timestamp,
}

impl ServiceDelivery {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payment_ref: String,
        trainer_id: TrainerId,
        client_id: UserId,
        service_type: ServiceType,
        package_name: String,
        quantity: u32,
        metadata: serde_json::Value,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: DeliveryId::new(),
            payment_ref,
            trainer_id,
            client_id,
            service_type,
            package_name,
            quantity,
            status: DeliveryStatus::Pending,
            metadata,
            created_at,
        }
    }
}

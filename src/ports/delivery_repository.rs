//! Delivery repository port.
//!
//! Persists service deliveries together with their generated tasks. The
//! unique constraint on the payment reference is what makes delivery
//! generation at-most-once: a replayed event hits the constraint instead of
//! producing a second delivery.

use async_trait::async_trait;

use crate::domain::delivery::{ServiceDelivery, ServiceTask};
use crate::domain::foundation::DomainError;

/// Outcome of an atomic delivery insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Delivery and tasks were inserted.
    Inserted,
    /// A delivery with this payment reference already exists; nothing was
    /// written.
    DuplicateReference,
}

/// Repository port for service delivery persistence.
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Atomically insert a delivery and its tasks.
    ///
    /// Uses `ON CONFLICT DO NOTHING` semantics on the payment reference:
    /// returns `DuplicateReference` (writing neither delivery nor tasks)
    /// when a delivery for the reference already exists.
    async fn insert_with_tasks(
        &self,
        delivery: &ServiceDelivery,
        tasks: &[ServiceTask],
    ) -> Result<InsertOutcome, DomainError>;

    /// Find a delivery by its provider payment reference.
    async fn find_by_payment_ref(
        &self,
        payment_ref: &str,
    ) -> Result<Option<ServiceDelivery>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DeliveryRepository) {}
    }
}

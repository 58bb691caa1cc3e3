//! Task template source port.
//!
//! Supplies the task blueprints instantiated alongside each generated
//! delivery. Blueprint count and content vary per service type and are
//! maintained outside the engine.

use async_trait::async_trait;

use crate::domain::catalog::ServiceType;
use crate::domain::delivery::TaskBlueprint;
use crate::domain::foundation::DomainError;

/// Read port for per-service-type task blueprints.
#[async_trait]
pub trait TaskTemplateSource: Send + Sync {
    /// Blueprints to instantiate for a delivery of the given service type.
    ///
    /// An empty vec is valid: the delivery is then created without tasks.
    async fn blueprints_for(
        &self,
        service_type: ServiceType,
    ) -> Result<Vec<TaskBlueprint>, DomainError>;
}

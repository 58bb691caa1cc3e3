//! Fulfillment tasks attached to a service delivery.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DeliveryId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Done,
}

/// Shape of one task to generate for a service type.
///
/// Blueprint count and content come from an external template source; the
/// engine only instantiates them at delivery creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBlueprint {
    pub title: String,
    pub sequence: u32,
}

/// One generated work item, created together with its delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTask {
    pub id: TaskId,
    pub delivery_id: DeliveryId,
    pub title: String,
    pub sequence: u32,
    pub status: TaskStatus,
}

impl ServiceTask {
    /// Instantiates a task from a blueprint for the given delivery.
    pub fn from_blueprint(delivery_id: DeliveryId, blueprint: &TaskBlueprint) -> Self {
        Self {
            id: TaskId::new(),
            delivery_id,
            title: blueprint.title.clone(),
            sequence: blueprint.sequence,
            status: TaskStatus::Open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_blueprint_copies_shape_and_opens() {
        let delivery_id = DeliveryId::new();
        let blueprint = TaskBlueprint {
            title: "Initial consultation call".to_string(),
            sequence: 1,
        };

        let task = ServiceTask::from_blueprint(delivery_id, &blueprint);

        assert_eq!(task.delivery_id, delivery_id);
        assert_eq!(task.title, "Initial consultation call");
        assert_eq!(task.sequence, 1);
        assert_eq!(task.status, TaskStatus::Open);
    }
}

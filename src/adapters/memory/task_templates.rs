//! Static task template source.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::domain::catalog::ServiceType;
use crate::domain::delivery::TaskBlueprint;
use crate::domain::foundation::DomainError;
use crate::ports::TaskTemplateSource;

fn blueprint(title: &str, sequence: u32) -> TaskBlueprint {
    TaskBlueprint {
        title: title.to_string(),
        sequence,
    }
}

/// Default blueprint table per service type.
static DEFAULT_BLUEPRINTS: Lazy<HashMap<ServiceType, Vec<TaskBlueprint>>> = Lazy::new(|| {
    HashMap::from([
        (
            ServiceType::Coaching,
            vec![
                blueprint("Kickoff call", 1),
                blueprint("Create training plan", 2),
                blueprint("Weekly check-in", 3),
            ],
        ),
        (
            ServiceType::PersonalTraining,
            vec![blueprint("Schedule first session", 1)],
        ),
        (
            ServiceType::NutritionPlan,
            vec![
                blueprint("Collect dietary preferences", 1),
                blueprint("Deliver nutrition plan", 2),
            ],
        ),
        (
            ServiceType::WorkoutProgram,
            vec![blueprint("Deliver workout program", 1)],
        ),
    ])
});

/// Serves blueprints from a fixed in-process table.
#[derive(Default)]
pub struct StaticTaskTemplates {
    overrides: HashMap<ServiceType, Vec<TaskBlueprint>>,
}

impl StaticTaskTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the blueprint set for one service type.
    pub fn with_blueprints(
        mut self,
        service_type: ServiceType,
        blueprints: Vec<TaskBlueprint>,
    ) -> Self {
        self.overrides.insert(service_type, blueprints);
        self
    }
}

#[async_trait]
impl TaskTemplateSource for StaticTaskTemplates {
    async fn blueprints_for(
        &self,
        service_type: ServiceType,
    ) -> Result<Vec<TaskBlueprint>, DomainError> {
        if let Some(blueprints) = self.overrides.get(&service_type) {
            return Ok(blueprints.clone());
        }
        Ok(DEFAULT_BLUEPRINTS
            .get(&service_type)
            .cloned()
            .unwrap_or_default())
    }
}

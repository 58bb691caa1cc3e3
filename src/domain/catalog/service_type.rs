//! Service type and recurrence classification for catalog packages.

use serde::{Deserialize, Serialize};

/// Internal classification of what a package delivers.
///
/// Catalog entries declare their service type as a free-form string; the
/// engine maps it here once per item. Unmappable strings cause the single
/// item to be skipped, never the whole event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Long-running, trainer-attached coaching engagement.
    Coaching,
    /// A block of one-on-one personal training sessions.
    PersonalTraining,
    /// A tailored nutrition plan.
    NutritionPlan,
    /// A one-off workout program.
    WorkoutProgram,
}

impl ServiceType {
    /// Maps a catalog-declared service-type string to the internal enum.
    ///
    /// Returns `None` for unknown values; callers log and skip the item.
    pub fn from_declared(s: &str) -> Option<Self> {
        match s {
            "coaching" => Some(Self::Coaching),
            "personal_training" => Some(Self::PersonalTraining),
            "nutrition_plan" => Some(Self::NutritionPlan),
            "workout_program" => Some(Self::WorkoutProgram),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coaching => "coaching",
            Self::PersonalTraining => "personal_training",
            Self::NutritionPlan => "nutrition_plan",
            Self::WorkoutProgram => "workout_program",
        }
    }
}

/// Billing recurrence class of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceClass {
    /// Single purchase, no subscription.
    OneTime,
    /// Monthly-cycle subscription (coaching plans bill monthly).
    Monthly,
    /// Yearly-cycle subscription.
    Yearly,
}

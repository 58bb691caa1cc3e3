//! Package template catalog entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PackageId, TrainerId};

use super::RecurrenceClass;

/// Immutable-per-event catalog entry describing what a subscription or
/// one-time purchase grants.
///
/// Owned by the catalog-management concern; the reconciliation engine only
/// reads it, resolved by provider price reference or lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTemplate {
    pub id: PackageId,

    /// Human-readable package name, used to name deliveries.
    pub name: String,

    /// Declared service-type string, mapped to `ServiceType` per item.
    pub service_type: String,

    /// Trainer owning this package, if trainer-issued.
    pub trainer_id: Option<TrainerId>,

    /// Billing recurrence class.
    pub recurrence: RecurrenceClass,

    /// Provider price reference used for resolution on webhook events.
    pub price_ref: String,

    /// Provider lookup key for plan identification.
    pub lookup_key: String,
}

impl PackageTemplate {
    /// Whether this package is a coaching-class package.
    ///
    /// Coaching packages drive trainer assignment and the yearly-plan
    /// coupling rule.
    pub fn is_coaching(&self) -> bool {
        self.service_type == "coaching"
    }

    /// Whether this package belongs to a yearly-cycle plan.
    pub fn is_yearly(&self) -> bool {
        self.recurrence == RecurrenceClass::Yearly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(service_type: &str, recurrence: RecurrenceClass) -> PackageTemplate {
        PackageTemplate {
            id: PackageId::new(),
            name: "Test Package".to_string(),
            service_type: service_type.to_string(),
            trainer_id: None,
            recurrence,
            price_ref: "price_123".to_string(),
            lookup_key: "test_package".to_string(),
        }
    }

    #[test]
    fn coaching_detection_uses_declared_type() {
        assert!(package("coaching", RecurrenceClass::Monthly).is_coaching());
        assert!(!package("nutrition_plan", RecurrenceClass::OneTime).is_coaching());
    }

    #[test]
    fn yearly_detection_uses_recurrence() {
        assert!(package("workout_program", RecurrenceClass::Yearly).is_yearly());
        assert!(!package("coaching", RecurrenceClass::Monthly).is_yearly());
    }
}

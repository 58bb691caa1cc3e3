//! Subscription status state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Subscription lifecycle status.
///
/// The absence of a record is the implicit NO_SUBSCRIPTION state; a new
/// record is created for reactivation rather than resurrecting a cancelled
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid and current.
    Active,

    /// Payment failed, inside the grace period.
    Pending,

    /// Terminal. Access revoked.
    Cancelled,
}

impl SubscriptionStatus {
    /// Maps a provider status string to the local status.
    ///
    /// Unknown values default to Active: the provider adds statuses faster
    /// than we track them, and treating an unknown status as a revocation
    /// would cut off paying users.
    pub fn from_provider(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "canceled" => Self::Cancelled,
            "past_due" => Self::Pending,
            _ => Self::Active,
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From ACTIVE
            (Active, Pending)
                | (Active, Cancelled)
                | (Active, Active) // Renewal
            // From PENDING (grace period)
                | (Pending, Active)
                | (Pending, Pending) // Repeated payment failure
                | (Pending, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Active => vec![Pending, Cancelled, Active],
            Pending => vec![Active, Pending, Cancelled],
            Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_mapping_follows_table() {
        assert_eq!(
            SubscriptionStatus::from_provider("active"),
            SubscriptionStatus::Active
        );
        assert_eq!(
            SubscriptionStatus::from_provider("canceled"),
            SubscriptionStatus::Cancelled
        );
        assert_eq!(
            SubscriptionStatus::from_provider("past_due"),
            SubscriptionStatus::Pending
        );
    }

    #[test]
    fn unknown_provider_status_defaults_to_active() {
        assert_eq!(
            SubscriptionStatus::from_provider("incomplete_expired"),
            SubscriptionStatus::Active
        );
        assert_eq!(
            SubscriptionStatus::from_provider(""),
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn active_can_enter_grace_period() {
        assert!(SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Pending));
    }

    #[test]
    fn pending_can_recover_or_cancel() {
        assert!(SubscriptionStatus::Pending.can_transition_to(&SubscriptionStatus::Active));
        assert!(SubscriptionStatus::Pending.can_transition_to(&SubscriptionStatus::Cancelled));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        assert!(!SubscriptionStatus::Cancelled.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Pending,
            SubscriptionStatus::Cancelled,
        ] {
            for target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&target),
                    "expected {:?} -> {:?} to be valid",
                    status,
                    target
                );
            }
        }
    }
}

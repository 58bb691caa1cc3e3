//! Offer status state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Promotional offer lifecycle status.
///
/// Monotonic and one-directional: Processing is the only state any
/// transition is allowed from. An offer already Paid, Completed or Expired
/// must not be re-evaluated by a later, stale notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Issued, awaiting checkout.
    Processing,

    /// Checkout completed with a one-time payment.
    Paid,

    /// Checkout funded a recurring subscription.
    Completed,

    /// The checkout session expired unused.
    Expired,
}

impl StateMachine for OfferStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OfferStatus::*;
        matches!(
            (self, target),
            (Processing, Paid) | (Processing, Completed) | (Processing, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OfferStatus::*;
        match self {
            Processing => vec![Paid, Completed, Expired],
            Paid | Completed | Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_reaches_each_terminal_state() {
        assert!(OfferStatus::Processing.can_transition_to(&OfferStatus::Paid));
        assert!(OfferStatus::Processing.can_transition_to(&OfferStatus::Completed));
        assert!(OfferStatus::Processing.can_transition_to(&OfferStatus::Expired));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for terminal in [OfferStatus::Paid, OfferStatus::Completed, OfferStatus::Expired] {
            assert!(terminal.is_terminal());
            for target in [
                OfferStatus::Processing,
                OfferStatus::Paid,
                OfferStatus::Completed,
                OfferStatus::Expired,
            ] {
                assert!(!terminal.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn paid_offer_rejects_late_expiry() {
        let result = OfferStatus::Paid.transition_to(OfferStatus::Expired);
        assert!(result.is_err());
    }
}

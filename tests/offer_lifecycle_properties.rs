//! Property tests for the offer lifecycle state machine.
//!
//! The offer status is monotonic: Processing is the only state any
//! transition is allowed from. These properties pin that down against
//! arbitrary event orderings.

use proptest::prelude::*;

use trainforge_billing::domain::foundation::{StateMachine, Timestamp, TrainerId};
use trainforge_billing::domain::offer::{CheckoutMode, Offer, OfferStatus};

fn any_status() -> impl Strategy<Value = OfferStatus> {
    prop_oneof![
        Just(OfferStatus::Processing),
        Just(OfferStatus::Paid),
        Just(OfferStatus::Completed),
        Just(OfferStatus::Expired),
    ]
}

fn settled_status() -> impl Strategy<Value = OfferStatus> {
    prop_oneof![
        Just(OfferStatus::Paid),
        Just(OfferStatus::Completed),
        Just(OfferStatus::Expired),
    ]
}

proptest! {
    #[test]
    fn settled_status_rejects_every_further_transition(
        settled in settled_status(),
        attempts in proptest::collection::vec(any_status(), 1..16),
    ) {
        prop_assert!(settled.is_terminal());
        for target in attempts {
            prop_assert!(settled.transition_to(target).is_err());
        }
    }

    #[test]
    fn only_processing_has_outgoing_transitions(status in any_status()) {
        let has_outgoing = !status.valid_transitions().is_empty();
        prop_assert_eq!(has_outgoing, status == OfferStatus::Processing);
    }

    #[test]
    fn first_settlement_wins_regardless_of_later_events(
        first in settled_status(),
        later in proptest::collection::vec(settled_status(), 1..8),
    ) {
        let mut offer = Offer::new(
            "tok_prop".to_string(),
            TrainerId::new(),
            "client@example.com".to_string(),
            vec![],
            Timestamp::now().add_days(3),
        );

        apply(&mut offer, first).unwrap();
        let settled = offer.status;

        for target in later {
            prop_assert!(apply(&mut offer, target).is_err());
            prop_assert_eq!(offer.status, settled);
        }
    }
}

fn apply(
    offer: &mut Offer,
    target: OfferStatus,
) -> Result<(), trainforge_billing::domain::foundation::DomainError> {
    match target {
        OfferStatus::Paid => offer.mark_paid(
            "cs_prop".to_string(),
            CheckoutMode::Payment,
            None,
            Timestamp::now(),
        ),
        OfferStatus::Completed => offer.mark_completed(Timestamp::now()),
        OfferStatus::Expired => offer.mark_expired(),
        OfferStatus::Processing => offer
            .status
            .transition_to(OfferStatus::Processing)
            .map(|_| ()),
    }
}

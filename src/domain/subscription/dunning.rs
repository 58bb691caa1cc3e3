//! Grace period and dunning policy.
//!
//! Pure decision logic for failed-payment handling: where the grace-period
//! deadline lands, when the retry count becomes an escalation, and when the
//! final warning goes out. The payment-failed handler applies these
//! decisions; cancellation itself only ever arrives as an explicit provider
//! deletion event.

use crate::domain::foundation::Timestamp;

/// Outcome of assessing a failed-payment retry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DunningAssessment {
    /// Below the configured maximum; normal grace-period handling.
    BelowThreshold,

    /// The configured maximum was reached. Logged as an escalation point;
    /// no automatic cancellation is performed (the provider's own
    /// subscription settings cancel and notify via a deletion event).
    Escalated,
}

/// Configured dunning policy values.
#[derive(Debug, Clone, Copy)]
pub struct DunningPolicy {
    /// Length of the grace period granted after a failed payment.
    pub grace_period_days: i64,

    /// Retry count at which the escalation point is logged.
    pub max_payment_retries: u32,

    /// Final warning is sent when this many days (or fewer) of grace remain.
    pub final_warning_days: i64,
}

impl DunningPolicy {
    /// Grace-period deadline for a failure observed at `now`.
    pub fn grace_deadline(&self, now: Timestamp) -> Timestamp {
        now.add_days(self.grace_period_days)
    }

    /// Assesses an already-incremented retry count.
    pub fn assess(&self, retries: u32) -> DunningAssessment {
        if retries >= self.max_payment_retries {
            DunningAssessment::Escalated
        } else {
            DunningAssessment::BelowThreshold
        }
    }

    /// Whether the final warning accompanies this failure: retries at or
    /// above the maximum and at most `final_warning_days` of grace left.
    pub fn should_send_final_warning(
        &self,
        retries: u32,
        grace_period_end: Timestamp,
        now: Timestamp,
    ) -> bool {
        retries >= self.max_payment_retries
            && grace_period_end.duration_since(&now).num_days() <= self.final_warning_days
    }
}

impl Default for DunningPolicy {
    fn default() -> Self {
        Self {
            grace_period_days: 7,
            max_payment_retries: 3,
            final_warning_days: 1,
        }
    }
}

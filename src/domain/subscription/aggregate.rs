//! Subscription aggregate entity.
//!
//! Represents one user's access grant to one package. Created on a provider
//! "subscription created" notification, mutated on every subsequent payment
//! success/failure/update notification, and terminated on an explicit
//! deletion notification.
//!
//! # Invariants
//!
//! - `is_in_grace_period == true` iff `grace_period_end` is set and
//!   `status == Pending`
//! - `is_trial_active == true` implies `trial_end` is set
//! - `failed_payment_retries` resets to 0 exactly when a payment succeeds

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, PackageId, StateMachine, SubscriptionId, Timestamp, TrainerId, UserId,
};

use super::SubscriptionStatus;

/// Trial window carried by a creation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Billing period carried by an invoice event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePeriod {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl InvoicePeriod {
    /// An initial setup invoice carries no real billing period: the
    /// provider stamps it with `period_start == period_end`.
    pub fn is_zero_length(&self) -> bool {
        self.start == self.end
    }
}

/// Marker recording that this subscription's collection was paused because
/// the user started a coaching plan. Distinguishes the pause from an
/// unrelated manual pause at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseMarker {
    /// Refreshed on every successful coaching payment.
    pub tagged_at: Timestamp,
}

/// Subscription aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub package_id: PackageId,
    pub trainer_id: Option<TrainerId>,
    pub status: SubscriptionStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,

    /// Provider subscription reference (sub_xxx).
    pub provider_subscription_ref: String,

    /// Provider price reference the subscription was created with.
    pub provider_price_ref: String,

    pub trial_start: Option<Timestamp>,
    pub trial_end: Option<Timestamp>,
    pub is_trial_active: bool,

    pub is_in_grace_period: bool,
    pub grace_period_end: Option<Timestamp>,
    pub failed_payment_retries: u32,
    pub last_payment_attempt: Option<Timestamp>,

    /// Mirror of the provider-level paused-for-coaching collection state.
    pub pause_marker: Option<PauseMarker>,
}

impl Subscription {
    /// Creates a new Active subscription from a provider creation event.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: SubscriptionId,
        user_id: UserId,
        package_id: PackageId,
        trainer_id: Option<TrainerId>,
        provider_subscription_ref: String,
        provider_price_ref: String,
        start_date: Timestamp,
        end_date: Timestamp,
        trial: Option<TrialWindow>,
    ) -> Self {
        Self {
            id,
            user_id,
            package_id,
            trainer_id,
            status: SubscriptionStatus::Active,
            start_date,
            end_date,
            provider_subscription_ref,
            provider_price_ref,
            trial_start: trial.map(|t| t.start),
            trial_end: trial.map(|t| t.end),
            is_trial_active: trial.is_some(),
            is_in_grace_period: false,
            grace_period_end: None,
            failed_payment_retries: 0,
            last_payment_attempt: None,
            pause_marker: None,
        }
    }

    /// Records a failed payment: enters (or stays in) the grace period and
    /// increments the retry counter.
    ///
    /// Returns the incremented retry count.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription is already Cancelled.
    pub fn record_payment_failure(
        &mut self,
        now: Timestamp,
        grace_period_end: Timestamp,
    ) -> Result<u32, DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Pending)?;
        self.is_in_grace_period = true;
        self.grace_period_end = Some(grace_period_end);
        self.failed_payment_retries += 1;
        self.last_payment_attempt = Some(now);
        Ok(self.failed_payment_retries)
    }

    /// Records a successful payment: clears the grace period, resets the
    /// retry counter and advances the billing period end.
    ///
    /// The end date is NOT advanced while the subscription is mid-trial, or
    /// when the invoice carries a zero-length period (an initial setup
    /// invoice must not overwrite the end date set at creation).
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription is already Cancelled.
    pub fn record_payment_success(
        &mut self,
        now: Timestamp,
        period: Option<InvoicePeriod>,
    ) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Active)?;
        self.is_in_grace_period = false;
        self.grace_period_end = None;
        self.failed_payment_retries = 0;
        self.last_payment_attempt = Some(now);

        if let Some(period) = period {
            if !self.is_trial_active && !period.is_zero_length() {
                self.end_date = period.end;
            }
        }
        Ok(())
    }

    /// Applies a provider status update together with an optional new period
    /// end, via the state machine. Leaving Pending clears the grace fields;
    /// only a Pending subscription can be in its grace period.
    pub fn apply_provider_status(
        &mut self,
        target: SubscriptionStatus,
        period_end: Option<Timestamp>,
    ) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        if self.status != SubscriptionStatus::Pending {
            self.is_in_grace_period = false;
            self.grace_period_end = None;
        }
        if let Some(end) = period_end {
            self.end_date = end;
        }
        Ok(())
    }

    /// Switches the subscription to a different package after a provider
    /// plan change (detected by a new price reference).
    pub fn switch_package(&mut self, package_id: PackageId, price_ref: String) {
        self.package_id = package_id;
        self.provider_price_ref = price_ref;
    }

    /// Force-cancels the subscription with immediate access revocation.
    ///
    /// Deliberately bypasses the state machine: a provider deletion event or
    /// a reactivation of the same plan must terminate the record whatever
    /// state it is in. Clears grace-period and trial flags unconditionally.
    pub fn cancel_now(&mut self, now: Timestamp) {
        self.status = SubscriptionStatus::Cancelled;
        self.end_date = now;
        self.is_in_grace_period = false;
        self.grace_period_end = None;
        self.is_trial_active = false;
        self.pause_marker = None;
    }

    /// Flips the trial flag off when the provider warns the trial is ending
    /// imminently.
    pub fn end_trial(&mut self) {
        self.is_trial_active = false;
    }

    /// Days remaining in the trial window, 0 when absent or elapsed.
    pub fn trial_days_remaining(&self) -> i64 {
        self.trial_end.map(|end| end.days_from_now()).unwrap_or(0)
    }

    /// Tags this subscription as paused for coaching.
    pub fn mark_paused_for_coaching(&mut self, now: Timestamp) {
        self.pause_marker = Some(PauseMarker { tagged_at: now });
    }

    /// Refreshes the pause marker timestamp on a repeat coaching payment.
    pub fn refresh_pause_marker(&mut self, now: Timestamp) {
        if let Some(marker) = &mut self.pause_marker {
            marker.tagged_at = now;
        }
    }

    /// Clears the paused-for-coaching marker.
    pub fn clear_pause_marker(&mut self) {
        self.pause_marker = None;
    }

    pub fn is_paused_for_coaching(&self) -> bool {
        self.pause_marker.is_some()
    }

    /// Grace-period invariant: `is_in_grace_period` holds exactly when a
    /// deadline is set and the status is Pending.
    pub fn grace_invariant_holds(&self) -> bool {
        self.is_in_grace_period
            == (self.grace_period_end.is_some() && self.status == SubscriptionStatus::Pending)
    }
}

//! Service delivery generation.
//!
//! Translates a completed monetary transaction into delivery records plus
//! their fulfillment tasks, keyed by the transaction's payment reference so
//! a retrying provider cannot produce duplicates.
//!
//! Two entry points: checkout completion (one or more purchased items) and
//! recurring coaching invoices (one billing-period-named delivery per
//! cycle, keyed by the invoice's own reference).

use std::sync::Arc;

use crate::domain::catalog::{PackageTemplate, ServiceType};
use crate::domain::delivery::{ServiceDelivery, ServiceTask};
use crate::domain::foundation::{Timestamp, TrainerId, UserId};
use crate::domain::subscription::{InvoicePeriod, Subscription};
use crate::ports::{DeliveryRepository, InsertOutcome, TaskTemplateSource};

use super::errors::EngineError;

/// One purchased item resolved against the catalog.
#[derive(Debug, Clone)]
pub struct PurchasedItem {
    pub package: PackageTemplate,
    pub quantity: u32,
}

pub struct DeliveryGenerator {
    deliveries: Arc<dyn DeliveryRepository>,
    templates: Arc<dyn TaskTemplateSource>,
}

impl DeliveryGenerator {
    pub fn new(
        deliveries: Arc<dyn DeliveryRepository>,
        templates: Arc<dyn TaskTemplateSource>,
    ) -> Self {
        Self {
            deliveries,
            templates,
        }
    }

    /// Generates one delivery (with tasks) per purchased item for a
    /// completed transaction.
    ///
    /// `trainer_override` takes precedence over each package's own trainer
    /// (offer-level ownership). Items whose service type cannot be mapped,
    /// or that resolve to no trainer at all, are skipped with a logged
    /// diagnostic rather than failing the whole transaction.
    ///
    /// Replays are detected up front by the payment reference; multi-item
    /// transactions key their extra deliveries by an ordinal suffix on the
    /// same reference so the per-reference uniqueness constraint holds.
    ///
    /// Returns the number of deliveries created.
    pub async fn generate(
        &self,
        payment_ref: &str,
        client_id: UserId,
        trainer_override: Option<TrainerId>,
        items: &[PurchasedItem],
        metadata: serde_json::Value,
        now: Timestamp,
    ) -> Result<u32, EngineError> {
        if self
            .deliveries
            .find_by_payment_ref(payment_ref)
            .await?
            .is_some()
        {
            tracing::info!(
                payment_ref = %payment_ref,
                "Deliveries already generated for payment reference, skipping replay"
            );
            return Ok(0);
        }

        let mut created = 0u32;
        for (index, item) in items.iter().enumerate() {
            let Some(service_type) = ServiceType::from_declared(&item.package.service_type)
            else {
                tracing::warn!(
                    payment_ref = %payment_ref,
                    package_id = %item.package.id,
                    declared = %item.package.service_type,
                    "Unmappable service type, skipping item"
                );
                continue;
            };

            let Some(trainer_id) = trainer_override.or(item.package.trainer_id) else {
                tracing::warn!(
                    payment_ref = %payment_ref,
                    package_id = %item.package.id,
                    "No trainer resolvable for item, skipping"
                );
                continue;
            };

            let item_ref = if index == 0 {
                payment_ref.to_string()
            } else {
                format!("{}#{}", payment_ref, index)
            };

            let delivery = ServiceDelivery::new(
                item_ref,
                trainer_id,
                client_id,
                service_type,
                item.package.name.clone(),
                item.quantity,
                metadata.clone(),
                now,
            );
            let tasks = self.instantiate_tasks(&delivery).await?;

            match self.deliveries.insert_with_tasks(&delivery, &tasks).await? {
                InsertOutcome::Inserted => created += 1,
                InsertOutcome::DuplicateReference => {
                    tracing::info!(
                        payment_ref = %delivery.payment_ref,
                        "Delivery already exists for reference, skipping"
                    );
                }
            }
        }

        Ok(created)
    }

    /// Generates the billing-period-named delivery for a recurring coaching
    /// invoice, keyed by the invoice's own reference.
    pub async fn generate_recurring(
        &self,
        invoice_ref: &str,
        subscription: &Subscription,
        package: &PackageTemplate,
        period: Option<InvoicePeriod>,
        now: Timestamp,
    ) -> Result<bool, EngineError> {
        let Some(service_type) = ServiceType::from_declared(&package.service_type) else {
            tracing::warn!(
                invoice_ref = %invoice_ref,
                declared = %package.service_type,
                "Unmappable service type on recurring invoice, skipping delivery"
            );
            return Ok(false);
        };

        let Some(trainer_id) = subscription.trainer_id.or(package.trainer_id) else {
            tracing::warn!(
                invoice_ref = %invoice_ref,
                subscription_id = %subscription.id,
                "No trainer resolvable for recurring delivery, skipping"
            );
            return Ok(false);
        };

        let delivery = ServiceDelivery::new(
            invoice_ref.to_string(),
            trainer_id,
            subscription.user_id,
            service_type,
            period_name(&package.name, period),
            1,
            serde_json::json!({
                "subscription_ref": subscription.provider_subscription_ref,
                "invoice_ref": invoice_ref,
            }),
            now,
        );
        let tasks = self.instantiate_tasks(&delivery).await?;

        match self.deliveries.insert_with_tasks(&delivery, &tasks).await? {
            InsertOutcome::Inserted => Ok(true),
            InsertOutcome::DuplicateReference => {
                tracing::info!(
                    invoice_ref = %invoice_ref,
                    "Recurring delivery already exists for invoice, skipping replay"
                );
                Ok(false)
            }
        }
    }

    async fn instantiate_tasks(
        &self,
        delivery: &ServiceDelivery,
    ) -> Result<Vec<ServiceTask>, EngineError> {
        let blueprints = self.templates.blueprints_for(delivery.service_type).await?;
        Ok(blueprints
            .iter()
            .map(|blueprint| ServiceTask::from_blueprint(delivery.id, blueprint))
            .collect())
    }
}

/// Names a recurring delivery after its billing period.
fn period_name(package_name: &str, period: Option<InvoicePeriod>) -> String {
    match period {
        Some(period) => format!(
            "{} ({} to {})",
            package_name,
            period.start.as_datetime().format("%Y-%m-%d"),
            period.end.as_datetime().format("%Y-%m-%d"),
        ),
        None => package_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_name_includes_both_dates() {
        let period = InvoicePeriod {
            start: Timestamp::from_unix_secs(1_704_067_200),
            end: Timestamp::from_unix_secs(1_706_745_600),
        };

        let name = period_name("Monthly Coaching", Some(period));

        assert_eq!(name, "Monthly Coaching (2024-01-01 to 2024-02-01)");
    }

    #[test]
    fn period_name_without_period_is_plain() {
        assert_eq!(period_name("Monthly Coaching", None), "Monthly Coaching");
    }
}

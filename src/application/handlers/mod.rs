//! Event handlers, one per provider notification type.

mod checkout_completed;
mod checkout_expired;
mod customer_deleted;
mod payment_failed;
mod payment_succeeded;
mod subscription_created;
mod subscription_deleted;
mod subscription_updated;
mod trial_will_end;

pub use checkout_completed::CheckoutCompletedHandler;
pub use checkout_expired::CheckoutExpiredHandler;
pub use customer_deleted::CustomerDeletedHandler;
pub use payment_failed::PaymentFailedHandler;
pub use payment_succeeded::PaymentSucceededHandler;
pub use subscription_created::SubscriptionCreatedHandler;
pub use subscription_deleted::SubscriptionDeletedHandler;
pub use subscription_updated::SubscriptionUpdatedHandler;
pub use trial_will_end::TrialWillEndHandler;

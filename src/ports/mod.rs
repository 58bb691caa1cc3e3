//! Ports: interfaces between the application core and the outside world.

mod billing_provider;
mod catalog_reader;
mod delivery_repository;
mod notifier;
mod offer_repository;
mod processed_event_store;
mod subscription_repository;
mod task_templates;
mod user_directory;

pub use billing_provider::{BillingProvider, ProviderCallError};
pub use catalog_reader::CatalogReader;
pub use delivery_repository::{DeliveryRepository, InsertOutcome};
pub use notifier::Notifier;
pub use offer_repository::OfferRepository;
pub use processed_event_store::{ProcessedEventRecord, ProcessedEventRepository, SaveResult};
pub use subscription_repository::SubscriptionRepository;
pub use task_templates::TaskTemplateSource;
pub use user_directory::{UserAccount, UserDirectory};

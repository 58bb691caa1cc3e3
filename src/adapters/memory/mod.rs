//! In-memory adapters.
//!
//! Backing store for tests and local development: plain maps behind
//! `tokio::sync::RwLock`, mirroring the uniqueness constraints the
//! database adapters enforce with primary keys.

mod billing_provider;
mod catalog;
mod delivery_repository;
mod notifier;
mod offer_repository;
mod processed_event_store;
mod subscription_repository;
mod task_templates;
mod user_directory;

pub use billing_provider::{ProviderCommand, RecordingBillingProvider};
pub use catalog::InMemoryCatalog;
pub use delivery_repository::InMemoryDeliveryRepository;
pub use notifier::{RecordingNotifier, SentNotification};
pub use offer_repository::InMemoryOfferRepository;
pub use processed_event_store::InMemoryProcessedEventRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use task_templates::StaticTaskTemplates;
pub use user_directory::InMemoryUserDirectory;

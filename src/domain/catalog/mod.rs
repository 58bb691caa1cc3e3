//! Catalog domain module.
//!
//! Read-only package templates owned by the catalog-management concern.
//! The reconciliation engine resolves them by provider price reference or
//! lookup key and never writes them.

mod package;
mod service_type;

pub use package::PackageTemplate;
pub use service_type::{RecurrenceClass, ServiceType};

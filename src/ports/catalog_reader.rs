//! Catalog reader port (read side).
//!
//! Read-only access to package templates. The engine resolves packages by
//! provider price reference (webhook events) or lookup key (plan
//! identification); it never writes to the catalog.

use async_trait::async_trait;

use crate::domain::catalog::PackageTemplate;
use crate::domain::foundation::{DomainError, PackageId};

/// Read port for the package catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Find a package by its internal ID.
    async fn find_by_id(&self, id: &PackageId) -> Result<Option<PackageTemplate>, DomainError>;

    /// Find a package by the provider price reference attached to it.
    async fn find_by_price_ref(
        &self,
        price_ref: &str,
    ) -> Result<Option<PackageTemplate>, DomainError>;

    /// Find a package by its provider lookup key.
    async fn find_by_lookup_key(
        &self,
        lookup_key: &str,
    ) -> Result<Option<PackageTemplate>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn CatalogReader) {}
    }
}

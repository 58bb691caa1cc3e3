//! In-memory package catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::catalog::PackageTemplate;
use crate::domain::foundation::{DomainError, PackageId};
use crate::ports::CatalogReader;

#[derive(Default)]
pub struct InMemoryCatalog {
    packages: RwLock<HashMap<PackageId, PackageTemplate>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a package; the engine only reads the catalog.
    pub async fn insert(&self, package: PackageTemplate) {
        self.packages.write().await.insert(package.id, package);
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn find_by_id(&self, id: &PackageId) -> Result<Option<PackageTemplate>, DomainError> {
        Ok(self.packages.read().await.get(id).cloned())
    }

    async fn find_by_price_ref(
        &self,
        price_ref: &str,
    ) -> Result<Option<PackageTemplate>, DomainError> {
        Ok(self
            .packages
            .read()
            .await
            .values()
            .find(|p| p.price_ref == price_ref)
            .cloned())
    }

    async fn find_by_lookup_key(
        &self,
        lookup_key: &str,
    ) -> Result<Option<PackageTemplate>, DomainError> {
        Ok(self
            .packages
            .read()
            .await
            .values()
            .find(|p| p.lookup_key == lookup_key)
            .cloned())
    }
}

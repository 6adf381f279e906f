//! In-memory product store.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{NewProduct, ProductPatch, ProductPredicate, ProductStore};
use crate::catalog::{Product, Timestamp};
use crate::error::StoreError;
use crate::ids::ProductId;

/// A [`ProductStore`] backed by a vector in insertion order.
///
/// Snapshots handed to [`MemoryStore::from_products`] are stored verbatim,
/// so a seeded catalog may contain records that writes would have rejected.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from an existing snapshot.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Load a JSON array of products from disk.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), count = products.len(), "loaded catalog snapshot");
        Ok(Self::from_products(products))
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find_active_matching(
        &self,
        predicate: &ProductPredicate,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| predicate.matches(p))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.into_product(ProductId::generate(), Timestamp::now());
        let violations = product.violations();
        if !violations.is_empty() {
            return Err(StoreError::Validation(violations));
        }

        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        let Some(slot) = products.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };

        let mut updated = slot.clone();
        patch.apply(&mut updated, Timestamp::now());
        let violations = updated.violations();
        if !violations.is_empty() {
            return Err(StoreError::Validation(violations));
        }

        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| &p.id != id);
        Ok(products.len() != before)
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let products = self.products.read().await;
        let categories: BTreeSet<&str> = products
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.category.as_str())
            .collect();
        Ok(categories.into_iter().map(String::from).collect())
    }
}

//! Storage collaborator contract.
//!
//! The search engine only ever reads through [`ProductStore::find_active_matching`];
//! the other operations are the plain key-based CRUD surface the host service
//! exposes next to search.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductStatus, Timestamp};
use crate::error::StoreError;
use crate::ids::ProductId;

/// Structured constraints pushed down to the store.
///
/// Every present bound is inclusive. Only active products ever match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPredicate {
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub min_discount: Option<f64>,
    pub min_rating: Option<f64>,
}

impl ProductPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn with_min_discount(mut self, min: f64) -> Self {
        self.min_discount = Some(min);
        self
    }

    pub fn with_min_rating(mut self, min: f64) -> Self {
        self.min_rating = Some(min);
        self
    }

    /// Check a single record. A NaN field never satisfies a bound.
    pub fn matches(&self, product: &Product) -> bool {
        product.is_active()
            && self
                .category
                .as_deref()
                .map_or(true, |category| product.category == category)
            && self.price_min.map_or(true, |min| product.price >= min)
            && self.price_max.map_or(true, |max| product.price <= max)
            && self.min_discount.map_or(true, |min| product.discount >= min)
            && self.min_rating.map_or(true, |min| product.rating >= min)
    }
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub stock: u64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: ProductStatus,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            ..Default::default()
        }
    }

    /// Materialize the record with a fresh id and both timestamps set to `now`.
    pub fn into_product(self, id: ProductId, now: Timestamp) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            description: self.description.map(|d| d.trim().to_string()),
            category: self.category.trim().to_string(),
            price: self.price,
            discount: self.discount,
            rating: self.rating,
            views: self.views,
            stock: self.stock,
            image: self.image,
            status: self.status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub rating: Option<f64>,
    pub views: Option<u64>,
    pub stock: Option<u64>,
    pub image: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// Apply the patch and bump `updated_at`.
    pub fn apply(self, product: &mut Product, now: Timestamp) {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            product.description = Some(description.trim().to_string());
        }
        if let Some(category) = self.category {
            product.category = category.trim().to_string();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(discount) = self.discount {
            product.discount = discount;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(views) = self.views {
            product.views = views;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        product.updated_at = now;
    }
}

/// Persistent product storage.
///
/// Implementations own validation on the write paths; readers receive
/// records that are expected, but not guaranteed, to satisfy the catalog
/// invariants.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All active products matching `predicate`, in the store's natural order.
    async fn find_active_matching(
        &self,
        predicate: &ProductPredicate,
    ) -> Result<Vec<Product>, StoreError>;

    /// Look up a product by id regardless of status.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Create a product. The store assigns the id and timestamps.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Update a product, returning the new version or `None` if it does not exist.
    async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError>;

    /// Delete a product, returning whether it existed.
    async fn delete(&self, id: &ProductId) -> Result<bool, StoreError>;

    /// Distinct categories of active products, ascending.
    async fn categories(&self) -> Result<Vec<String>, StoreError>;
}

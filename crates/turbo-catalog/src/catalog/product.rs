//! Product types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// Product visibility status. Only active products are ever searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            other => Err(format!("unknown product status '{}'", other)),
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instant as recorded by the store.
///
/// The raw text is kept as-is so that a malformed value survives a round
/// trip; [`Timestamp::instant`] returns `None` for anything that is not
/// RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// The current time, millisecond precision, UTC.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Wrap a raw value without validating it.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the stored value.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.0.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name; the primary relevance field.
    pub name: String,
    /// Free-form description; the secondary relevance field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category name, matched exactly by filters.
    pub category: String,
    /// List price.
    pub price: f64,
    /// Discount percentage in `[0, 100]`.
    #[serde(default)]
    pub discount: f64,
    /// Average rating in `[0, 5]`.
    #[serde(default)]
    pub rating: f64,
    /// View counter.
    #[serde(default)]
    pub views: u64,
    /// Units in stock.
    #[serde(default)]
    pub stock: u64,
    /// Image URL, display only.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Create an active product with zeroed counters, timestamped now.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        let now = Timestamp::now();
        Self {
            id: ProductId::generate(),
            name: name.into(),
            description: None,
            category: category.into(),
            price,
            discount: 0.0,
            rating: 0.0,
            views: 0,
            stock: 0,
            image: String::new(),
            status: ProductStatus::Active,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Description, treating an empty or blank string as absent.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// Price after the discount is applied. The discount is clamped to
    /// `[0, 100]` so malformed records never yield a negative price.
    pub fn discounted_price(&self) -> f64 {
        let pct = if self.discount.is_finite() {
            self.discount.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.price * (100.0 - pct) / 100.0
    }

    /// Catalog invariants this record breaks. Empty when the record is valid.
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("name must not be empty".to_string());
        }
        if self.category.trim().is_empty() {
            errors.push("category must not be empty".to_string());
        }
        if !(self.price.is_finite() && self.price >= 0.0) {
            errors.push(format!("price must be >= 0, got {}", self.price));
        }
        if !(0.0..=100.0).contains(&self.discount) {
            errors.push(format!("discount must be within 0..=100, got {}", self.discount));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            errors.push(format!("rating must be within 0..=5, got {}", self.rating));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let product = Product::new("Wireless Mouse", "Electronics", 250_000.0);
        assert!(product.is_active());
        assert!(!product.is_in_stock());
        assert_eq!(product.created_at, product.updated_at);
        assert!(product.created_at.instant().is_some());
        assert!(product.violations().is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("ACTIVE".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert_eq!("inactive".parse::<ProductStatus>(), Ok(ProductStatus::Inactive));
        assert!("archived".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_discounted_price_clamps_discount() {
        let mut product = Product::new("Desk", "Furniture", 200.0);
        product.discount = 25.0;
        assert_eq!(product.discounted_price(), 150.0);

        product.discount = 140.0;
        assert_eq!(product.discounted_price(), 0.0);

        product.discount = f64::NAN;
        assert_eq!(product.discounted_price(), 200.0);
    }

    #[test]
    fn test_violations() {
        let mut product = Product::new("", "Books", -1.0);
        product.rating = 6.0;
        product.discount = 101.0;
        let errors = product.violations();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_malformed_timestamp_survives_round_trip() {
        let ts = Timestamp::from_raw("not-a-date");
        assert!(ts.instant().is_none());
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "not-a-date");
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let json = r#"{
            "id": "p1",
            "name": "Rust Book",
            "category": "Books",
            "price": 100,
            "status": "inactive",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.status, ProductStatus::Inactive);
        assert_eq!(product.description, None);
        assert_eq!(product.views, 0);
        assert!(product.updated_at.instant() > product.created_at.instant());

        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
    }
}

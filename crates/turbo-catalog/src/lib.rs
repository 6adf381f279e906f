//! Product catalog search for TurboCommerce.
//!
//! This crate answers "find products matching these constraints, ranked and
//! paged" over a product store:
//!
//! - **Catalog**: Products, statuses, timestamps
//! - **Store**: The async storage contract and an in-memory implementation
//! - **Search**: Structured filters, typo-tolerant ranking, stable sorting, pagination
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_catalog::prelude::*;
//!
//! let store = MemoryStore::load_json("catalog.json").await?;
//! let engine = SearchEngine::new(store);
//!
//! // "wireles mose" still finds "Wireless Mouse".
//! let page = engine
//!     .search(&SearchQuery::new().with_term("wireles mose").with_category("Electronics"))
//!     .await?;
//!
//! for item in &page.items {
//!     println!("{} ({:.2})", item.product.name, item.score.unwrap_or(0.0));
//! }
//! println!("page {} of {}", page.pagination.page, page.pagination.total_pages);
//! ```

pub mod error;
pub mod ids;

pub mod catalog;
pub mod search;
pub mod store;

pub use error::{CatalogError, StoreError};
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, StoreError};
    pub use crate::ids::ProductId;

    // Catalog
    pub use crate::catalog::{Product, ProductStatus, Timestamp};

    // Store
    pub use crate::store::{MemoryStore, NewProduct, ProductPatch, ProductPredicate, ProductStore};

    // Search
    pub use crate::search::{
        AppliedQuery, Pagination, ResultPage, ScoredProduct, SearchConfig, SearchEngine,
        SearchParams, SearchQuery, SortField, SortKey, SortOrder,
    };
}

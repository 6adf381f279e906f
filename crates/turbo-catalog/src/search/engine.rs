//! The search-and-rank pipeline.
//!
//! ```text
//! store ──► predicate filter ──► fuzzy ranker ──► sorter ──► paginator ──► ResultPage
//! ```
//!
//! Only the first arrow performs I/O. Once the candidate set is in memory the
//! rest of the pipeline is a pure function of `(candidates, query, config)`.
//!
//! When a term is present the whole predicate-filtered candidate set has to
//! be materialized before ranking, because relevance ordering cannot be
//! pushed down to the store. Memory and CPU per query therefore grow with the
//! number of candidates; the engine is sized for catalogs that fit in memory
//! for a single request and deliberately applies no cap of its own.

use tracing::{debug, debug_span, warn, Instrument};

use crate::catalog::Product;
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::search::config::SearchConfig;
use crate::search::filter;
use crate::search::fuzzy::Ranker;
use crate::search::query::{AppliedQuery, SearchQuery};
use crate::search::results::{paginate, ResultPage, ScoredProduct};
use crate::search::sort::{sort_products, SortField, SortOrder};
use crate::store::ProductStore;

/// Search engine over a [`ProductStore`].
///
/// Holds no per-query state; one engine can serve any number of concurrent
/// queries.
#[derive(Debug)]
pub struct SearchEngine<S> {
    store: S,
    config: SearchConfig,
}

impl<S: ProductStore> SearchEngine<S> {
    /// Create an engine with the default ranking settings.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: SearchConfig::default(),
        }
    }

    /// Create an engine with custom settings.
    pub fn with_config(store: S, config: SearchConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a query: fetch candidates once, then rank, sort and paginate.
    ///
    /// Store failures are returned as-is and never turned into an empty page.
    pub async fn search(&self, query: &SearchQuery) -> Result<ResultPage, CatalogError> {
        let applied = query.normalize(&self.config);
        let span = debug_span!(
            "search",
            term = applied.term.as_deref().unwrap_or(""),
            sort_by = %applied.sort_by,
            page = applied.page,
            limit = applied.limit,
        );

        let predicate = applied.predicate();
        let candidates = self
            .store
            .find_active_matching(&predicate)
            .instrument(span.clone())
            .await
            .map_err(|e| {
                warn!(parent: &span, error = %e, "candidate fetch failed");
                e
            })?;

        let _entered = span.enter();
        Ok(run_pipeline(candidates, &applied, &self.config))
    }

    /// The plain catalog listing: active products, optionally in one
    /// category, newest first.
    pub async fn list_products(
        &self,
        page: u32,
        limit: u32,
        category: Option<&str>,
    ) -> Result<ResultPage, CatalogError> {
        let mut query = SearchQuery::new()
            .with_sort(SortField::CreatedAt, SortOrder::Desc)
            .with_pagination(page, limit);
        if let Some(category) = category {
            query = query.with_category(category);
        }
        self.search(&query).await
    }

    /// Distinct categories of active products.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.categories().await?)
    }

    /// Look up one product by id.
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }
}

/// The in-memory part of the pipeline.
///
/// `candidates` may be any snapshot; the predicate is re-applied so the
/// result never contains inactive or out-of-range records.
pub fn run_pipeline(
    candidates: Vec<Product>,
    query: &AppliedQuery,
    config: &SearchConfig,
) -> ResultPage {
    let predicate = query.predicate();
    let candidates = filter::apply(candidates, &predicate);
    let candidate_count = candidates.len();

    let ranked: Vec<ScoredProduct> = match query.term.as_deref() {
        Some(term) => Ranker::new(term, config).rank(candidates),
        None => candidates.into_iter().map(ScoredProduct::unscored).collect(),
    };
    let ranked_count = ranked.len();

    let sorted = sort_products(ranked, query.sort_by, query.sort_order);
    let (items, pagination) = paginate(sorted, query.page, query.limit);

    debug!(
        candidates = candidate_count,
        ranked = ranked_count,
        returned = items.len(),
        total_pages = pagination.total_pages,
        "search pipeline complete"
    );

    ResultPage {
        items,
        pagination,
        filters: query.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductStatus, Timestamp};
    use crate::error::StoreError;
    use crate::search::sort::SortKey;
    use crate::store::{MemoryStore, NewProduct, ProductPatch, ProductPredicate};
    use async_trait::async_trait;

    fn product(name: &str, category: &str, price: f64, created_at: &str) -> Product {
        let mut p = Product::new(name, category, price);
        p.created_at = Timestamp::from_raw(created_at);
        p.updated_at = Timestamp::from_raw(created_at);
        p
    }

    fn catalog() -> Vec<Product> {
        let mut hidden = product("Wireless Keyboard", "Electronics", 90.0, "2024-05-01T00:00:00Z");
        hidden.status = ProductStatus::Inactive;
        vec![
            product("Wireless Mouse", "Electronics", 25.0, "2024-01-01T00:00:00Z"),
            product("Rust in Action", "Books", 45.0, "2024-03-01T00:00:00Z"),
            hidden,
            product("Mouse Pad", "Accessories", 8.0, "2024-02-01T00:00:00Z"),
        ]
    }

    fn names(page: &ResultPage) -> Vec<&str> {
        page.products().map(|p| p.name.as_str()).collect()
    }

    struct UnavailableStore;

    #[async_trait]
    impl ProductStore for UnavailableStore {
        async fn find_active_matching(
            &self,
            _predicate: &ProductPredicate,
        ) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn insert(&self, _product: NewProduct) -> Result<Product, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn update(
            &self,
            _id: &ProductId,
            _patch: ProductPatch,
        ) -> Result<Option<Product>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn delete(&self, _id: &ProductId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn categories(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let engine = SearchEngine::new(MemoryStore::from_products(catalog()));
        let page = engine.search(&SearchQuery::new()).await.unwrap();
        assert_eq!(names(&page), vec!["Rust in Action", "Mouse Pad", "Wireless Mouse"]);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.filters.sort_by, SortKey::Field(SortField::CreatedAt));
    }

    #[tokio::test]
    async fn test_term_without_sort_ranks_by_relevance() {
        let engine = SearchEngine::new(MemoryStore::from_products(catalog()));
        let page = engine
            .search(&SearchQuery::new().with_term("mouse"))
            .await
            .unwrap();
        // Both names contain "mouse" exactly; ties keep store order.
        assert_eq!(names(&page), vec!["Wireless Mouse", "Mouse Pad"]);
        assert_eq!(page.filters.sort_by, SortKey::Relevance);
        assert!(page.items.iter().all(|i| i.score.is_some()));
    }

    #[tokio::test]
    async fn test_explicit_sort_overrides_relevance() {
        let engine = SearchEngine::new(MemoryStore::from_products(catalog()));
        let query = SearchQuery::new()
            .with_term("mouse")
            .with_sort(SortField::Price, SortOrder::Asc);
        let page = engine.search(&query).await.unwrap();
        assert_eq!(names(&page), vec!["Mouse Pad", "Wireless Mouse"]);
    }

    #[tokio::test]
    async fn test_inactive_records_never_surface() {
        let engine = SearchEngine::new(MemoryStore::from_products(catalog()));
        let page = engine
            .search(&SearchQuery::new().with_term("keyboard"))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let engine = SearchEngine::new(UnavailableStore);
        let err = engine.search(&SearchQuery::new()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::Unavailable(_))));

        let err = engine.categories().await.unwrap_err();
        assert!(matches!(err, CatalogError::Store(_)));
    }

    #[tokio::test]
    async fn test_list_products_by_category() {
        let engine = SearchEngine::new(MemoryStore::from_products(catalog()));
        let page = engine.list_products(1, 10, Some("Books")).await.unwrap();
        assert_eq!(names(&page), vec!["Rust in Action"]);
        assert_eq!(page.filters.category.as_deref(), Some("Books"));
    }

    #[tokio::test]
    async fn test_get_product() {
        let products = catalog();
        let id = products[1].id.clone();
        let engine = SearchEngine::new(MemoryStore::from_products(products));
        assert_eq!(engine.get_product(&id).await.unwrap().name, "Rust in Action");

        let err = engine
            .get_product(&ProductId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_with_config_validates() {
        let config = SearchConfig {
            tolerance: 2.0,
            ..Default::default()
        };
        assert!(SearchEngine::with_config(MemoryStore::new(), config).is_err());
    }

    #[test]
    fn test_run_pipeline_refilters_raw_snapshots() {
        let applied = SearchQuery::new()
            .with_price_range(Some(20.0), Some(100.0))
            .normalize(&SearchConfig::default());
        let page = run_pipeline(catalog(), &applied, &SearchConfig::default());
        assert_eq!(names(&page), vec!["Rust in Action", "Wireless Mouse"]);
    }
}

//! Search query builder.

use serde::{Deserialize, Serialize};

use crate::search::config::SearchConfig;
use crate::search::sort::{SortField, SortKey, SortOrder};
use crate::store::ProductPredicate;

/// A search query as supplied by the caller.
///
/// Every field is optional; [`SearchQuery::normalize`] substitutes the
/// defaults and clamps pagination into range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free-text term matched against name, description and category.
    pub term: Option<String>,
    /// Exact category filter.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Inclusive discount floor, in percent.
    pub min_discount: Option<f64>,
    /// Inclusive rating floor.
    pub min_rating: Option<f64>,
    /// Sort field; unset means `createdAt`, or relevance when a term is present.
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Create a new, unconstrained query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text term. Blank terms are ignored.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.term = if term.trim().is_empty() { None } else { Some(term) };
        self
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

    /// Set sort field and direction.
    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Fill in defaults and clamp out-of-range pagination.
    pub fn normalize(&self, config: &SearchConfig) -> AppliedQuery {
        let term = non_blank(self.term.as_deref());
        let sort_by = match (self.sort_by, &term) {
            (Some(field), _) => SortKey::Field(field),
            (None, Some(_)) => SortKey::Relevance,
            (None, None) => SortKey::Field(SortField::default()),
        };

        AppliedQuery {
            term,
            category: non_blank(self.category.as_deref()),
            price_min: self.price_min,
            price_max: self.price_max,
            min_discount: self.min_discount,
            min_rating: self.min_rating,
            sort_by,
            sort_order: self.sort_order.unwrap_or_default(),
            page: self.page.unwrap_or(1).max(1),
            limit: config.clamp_limit(self.limit.unwrap_or(config.default_limit)),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// The query the engine actually ran, echoed back in every result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedQuery {
    pub term: Option<String>,
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub min_discount: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl AppliedQuery {
    /// The structured constraints to push down to the store.
    pub fn predicate(&self) -> ProductPredicate {
        ProductPredicate {
            category: self.category.clone(),
            price_min: self.price_min,
            price_max: self.price_max,
            min_discount: self.min_discount,
            min_rating: self.min_rating,
        }
    }

    pub fn has_term(&self) -> bool {
        self.term.is_some()
    }
}

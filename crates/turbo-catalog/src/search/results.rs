//! Search results and pagination.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::search::query::AppliedQuery;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of matching items across all pages.
    pub total: usize,
    /// Total number of pages; zero when nothing matched.
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info. `page` and `limit` are expected to be >= 1.
    pub fn new(page: u32, limit: u32, total: usize) -> Self {
        let per_page = limit.max(1) as usize;
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(per_page),
            has_next: (page as usize).saturating_mul(per_page) < total,
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1).saturating_mul(self.limit as usize)
    }

    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    /// Get start item number (1-indexed), zero for an empty page.
    pub fn start_item(&self) -> usize {
        if self.offset() >= self.total {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number (1-indexed), zero for an empty page.
    pub fn end_item(&self) -> usize {
        if self.start_item() == 0 {
            0
        } else {
            (self.offset() + self.limit as usize).min(self.total)
        }
    }
}

/// Slice one page out of a fully ordered sequence.
///
/// Pages past the end yield an empty slice rather than an error.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> (Vec<T>, Pagination) {
    let pagination = Pagination::new(page, limit, items.len());
    let offset = pagination.offset();
    let page_items = if offset >= items.len() {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect()
    };
    (page_items, pagination)
}

/// A product together with its relevance score, when a term was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ScoredProduct {
    pub fn unscored(product: Product) -> Self {
        Self {
            product,
            score: None,
        }
    }

    pub fn scored(product: Product, score: f64) -> Self {
        Self {
            product,
            score: Some(score),
        }
    }
}

/// One page of search output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// The page's products in final order.
    pub items: Vec<ScoredProduct>,
    pub pagination: Pagination,
    /// The query as applied, defaults filled in.
    pub filters: AppliedQuery,
}

impl ResultPage {
    /// Iterate the page's products in order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.items.iter().map(|item| &item.product)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

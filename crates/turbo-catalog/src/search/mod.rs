//! Search module.
//!
//! The catalog search pipeline: predicate filter, fuzzy ranker, stable
//! sorter and paginator, plus the query and parameter types that feed it.

mod config;
mod engine;
mod params;
mod query;
mod results;

pub mod filter;
pub mod fuzzy;
pub mod sort;

pub use config::SearchConfig;
pub use engine::{run_pipeline, SearchEngine};
pub use fuzzy::{FieldScores, FuzzyMatcher, Ranker};
pub use params::{SearchParams, MAX_CATEGORY_CHARS};
pub use query::{AppliedQuery, SearchQuery};
pub use results::{paginate, Pagination, ResultPage, ScoredProduct};
pub use sort::{sort_products, SortField, SortKey, SortKind, SortOrder};

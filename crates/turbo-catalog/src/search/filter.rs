//! Predicate filter stage.
//!
//! The store does the heavy lifting; this stage re-checks whatever it
//! returned so that a loosely implemented store can never leak inactive or
//! out-of-range records into the ranker.

use tracing::debug;

use crate::catalog::Product;
use crate::store::ProductPredicate;

/// Keep only candidates satisfying `predicate`, preserving order.
pub fn apply(candidates: Vec<Product>, predicate: &ProductPredicate) -> Vec<Product> {
    let fetched = candidates.len();
    let kept: Vec<Product> = candidates
        .into_iter()
        .filter(|p| predicate.matches(p))
        .collect();

    if kept.len() != fetched {
        debug!(
            fetched,
            kept = kept.len(),
            "store returned records outside the predicate"
        );
    }
    kept
}

/// Human-readable list of the constraints in effect.
pub fn describe(predicate: &ProductPredicate) -> Vec<String> {
    let mut parts = vec!["status = active".to_string()];
    if let Some(category) = &predicate.category {
        parts.push(format!("category = {}", category));
    }
    match (predicate.price_min, predicate.price_max) {
        (Some(min), Some(max)) => parts.push(format!("{} <= price <= {}", min, max)),
        (Some(min), None) => parts.push(format!("price >= {}", min)),
        (None, Some(max)) => parts.push(format!("price <= {}", max)),
        (None, None) => {}
    }
    if let Some(min) = predicate.min_discount {
        parts.push(format!("discount >= {}", min));
    }
    if let Some(min) = predicate.min_rating {
        parts.push(format!("rating >= {}", min));
    }
    parts
}

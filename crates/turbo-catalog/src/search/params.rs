//! Request parameter validation.
//!
//! Transports hand over loosely typed strings; [`SearchParams::validate`]
//! turns them into a [`SearchQuery`] or rejects the request with every
//! problem listed, before the search pipeline runs.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::search::config::SearchConfig;
use crate::search::query::SearchQuery;
use crate::search::sort::{SortField, SortOrder};

/// Longest category name accepted in a query.
pub const MAX_CATEGORY_CHARS: usize = 50;

/// Raw search parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search term; `q` wins over `query` when both are present.
    pub q: Option<String>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_discount: Option<String>,
    pub min_rating: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Parse an `application/x-www-form-urlencoded` query string.
    /// Unknown keys are ignored; later duplicates win.
    pub fn from_query_string(qs: &str) -> Self {
        let mut params = SearchParams::default();

        for pair in qs.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = Some(percent_decode(parts.next().unwrap_or("")));

            match key {
                "q" => params.q = value,
                "query" => params.query = value,
                "category" => params.category = value,
                "minPrice" => params.min_price = value,
                "maxPrice" => params.max_price = value,
                "minDiscount" => params.min_discount = value,
                "minRating" => params.min_rating = value,
                "sortBy" => params.sort_by = value,
                "sortOrder" => params.sort_order = value,
                "page" => params.page = value,
                "limit" => params.limit = value,
                _ => {}
            }
        }

        params
    }

    /// Validate against the default limits.
    pub fn validate(&self) -> Result<SearchQuery, CatalogError> {
        self.validate_with(&SearchConfig::default())
    }

    /// Validate and convert. Omitted sort settings default to newest first.
    pub fn validate_with(&self, config: &SearchConfig) -> Result<SearchQuery, CatalogError> {
        let mut errors = Vec::new();

        let term = present(&self.q).or_else(|| present(&self.query));

        let category = present(&self.category);
        if let Some(category) = category {
            if category.chars().count() > MAX_CATEGORY_CHARS {
                errors.push(format!(
                    "category must be at most {} characters",
                    MAX_CATEGORY_CHARS
                ));
            }
        }

        let price_min = parse_number("minPrice", &self.min_price, &mut errors);
        let price_max = parse_number("maxPrice", &self.max_price, &mut errors);
        let min_discount = parse_number("minDiscount", &self.min_discount, &mut errors);
        let min_rating = parse_number("minRating", &self.min_rating, &mut errors);

        let page = match present(&self.page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    errors.push(format!("page must be a positive integer, got '{}'", raw));
                    1
                }
            },
        };

        let limit = match present(&self.limit) {
            None => config.default_limit,
            Some(raw) => match raw.parse::<u32>() {
                Ok(limit) if (1..=config.max_limit).contains(&limit) => limit,
                _ => {
                    errors.push(format!(
                        "limit must be between 1 and {}, got '{}'",
                        config.max_limit, raw
                    ));
                    config.default_limit
                }
            },
        };

        let sort_by = match present(&self.sort_by) {
            None => SortField::CreatedAt,
            Some(raw) => raw.parse::<SortField>().unwrap_or_else(|e| {
                errors.push(e);
                SortField::CreatedAt
            }),
        };

        let sort_order = match present(&self.sort_order) {
            None => SortOrder::Desc,
            Some(raw) => raw.parse::<SortOrder>().unwrap_or_else(|e| {
                errors.push(e);
                SortOrder::Desc
            }),
        };

        if !errors.is_empty() {
            return Err(CatalogError::InvalidInput(errors));
        }

        Ok(SearchQuery {
            term: term.map(String::from),
            category: category.map(String::from),
            price_min,
            price_max,
            min_discount,
            min_rating,
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
            page: Some(page),
            limit: Some(limit),
        })
    }
}

/// Trimmed value, or `None` when absent or blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: &Option<String>, errors: &mut Vec<String>) -> Option<f64> {
    let raw = present(value)?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(format!("{} must be a number, got '{}'", name, raw));
            None
        }
    }
}

/// Decode `%XX` escapes and `+` as space. Invalid UTF-8 is replaced.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = &bytes[i + 1..i + 3];
                let byte = hex
                    .iter()
                    .all(u8::is_ascii_hexdigit)
                    .then(|| std::str::from_utf8(hex).ok())
                    .flatten()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match byte {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let qs: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        SearchParams::from_query_string(&qs.join("&"))
    }

    #[test]
    fn test_defaults_follow_the_listing_contract() {
        let query = SearchParams::default().validate().unwrap();
        assert_eq!(query.term, None);
        assert_eq!(query.sort_by, Some(SortField::CreatedAt));
        assert_eq!(query.sort_order, Some(SortOrder::Desc));
        assert_eq!(query.page, Some(1));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_full_query_string() {
        let query = SearchParams::from_query_string(
            "?q=wireless+mouse&category=Electronics&minPrice=100&maxPrice=300.5\
             &minDiscount=20&minRating=4&sortBy=price&sortOrder=asc&page=2&limit=5",
        )
        .validate()
        .unwrap();
        assert_eq!(query.term.as_deref(), Some("wireless mouse"));
        assert_eq!(query.category.as_deref(), Some("Electronics"));
        assert_eq!(query.price_min, Some(100.0));
        assert_eq!(query.price_max, Some(300.5));
        assert_eq!(query.min_discount, Some(20.0));
        assert_eq!(query.min_rating, Some(4.0));
        assert_eq!(query.sort_by, Some(SortField::Price));
        assert_eq!(query.sort_order, Some(SortOrder::Asc));
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_q_wins_over_query() {
        let query = params(&[("query", "lamp"), ("q", "desk")]).validate().unwrap();
        assert_eq!(query.term.as_deref(), Some("desk"));
        let query = params(&[("query", "lamp"), ("q", "")]).validate().unwrap();
        assert_eq!(query.term.as_deref(), Some("lamp"));
    }

    #[test]
    fn test_rejects_every_violation_at_once() {
        let err = params(&[
            ("limit", "101"),
            ("page", "0"),
            ("sortBy", "color"),
            ("sortOrder", "up"),
            ("minPrice", "cheap"),
        ])
        .validate()
        .unwrap_err();
        match err {
            CatalogError::InvalidInput(errors) => assert_eq!(errors.len(), 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_limit_boundaries() {
        assert!(params(&[("limit", "1")]).validate().is_ok());
        assert!(params(&[("limit", "100")]).validate().is_ok());
        assert!(params(&[("limit", "0")]).validate().is_err());
        assert!(params(&[("limit", "-3")]).validate().is_err());
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        assert!(params(&[("minRating", "NaN")]).validate().is_err());
        assert!(params(&[("maxPrice", "inf")]).validate().is_err());
    }

    #[test]
    fn test_category_length() {
        let long = "x".repeat(MAX_CATEGORY_CHARS + 1);
        assert!(params(&[("category", long.as_str())]).validate().is_err());
        let ok = "x".repeat(MAX_CATEGORY_CHARS);
        assert!(params(&[("category", ok.as_str())]).validate().is_ok());
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(percent_decode("Books%20%26%20Media"), "Books & Media");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}

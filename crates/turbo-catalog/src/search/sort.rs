//! Sort keys and the stable sorter.
//!
//! Each public sort field maps to one comparison kind. Values are extracted
//! once per record and the records are merge-sorted on the extracted values,
//! so equal keys keep the order produced by the previous stage.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::Product;
use crate::search::results::ScoredProduct;

/// Fields a caller may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
    Views,
    Rating,
    Discount,
}

/// How values of a sort field are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Case-sensitive lexicographic order.
    Text,
    /// Numeric order.
    Number,
    /// Chronological order; unparseable instants compare equal to anything.
    Instant,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::Price,
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Views,
        SortField::Rating,
        SortField::Discount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Views => "views",
            SortField::Rating => "rating",
            SortField::Discount => "discount",
        }
    }

    pub fn kind(&self) -> SortKind {
        match self {
            SortField::Name => SortKind::Text,
            SortField::Price | SortField::Views | SortField::Rating | SortField::Discount => {
                SortKind::Number
            }
            SortField::CreatedAt | SortField::UpdatedAt => SortKind::Instant,
        }
    }

    fn value<'a>(&self, product: &'a Product) -> SortValue<'a> {
        match self {
            SortField::Name => SortValue::Text(&product.name),
            SortField::Price => SortValue::Number(product.price),
            SortField::Views => SortValue::Number(product.views as f64),
            SortField::Rating => SortValue::Number(product.rating),
            SortField::Discount => SortValue::Number(product.discount),
            SortField::CreatedAt => SortValue::Instant(product.created_at.instant()),
            SortField::UpdatedAt => SortValue::Instant(product.updated_at.instant()),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown sortBy '{}'", s))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sortOrder '{}'", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordering actually applied to a result set.
///
/// `Relevance` is never requested directly; it is what an unset sort field
/// resolves to when a search term is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Field(SortField),
    Relevance,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Field(field) => field.as_str(),
            SortKey::Relevance => "relevance",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Field(SortField::default())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "relevance" {
            return Ok(SortKey::Relevance);
        }
        s.parse::<SortField>()
            .map(SortKey::Field)
            .map_err(serde::de::Error::custom)
    }
}

/// A sort key extracted from one record.
#[derive(Debug, Clone, Copy)]
enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Instant(Option<DateTime<Utc>>),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Instant(Some(a)), SortValue::Instant(Some(b))) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Order `items` by `key` and `order`, preserving the relative order of ties.
pub fn sort_products(
    items: Vec<ScoredProduct>,
    key: SortKey,
    order: SortOrder,
) -> Vec<ScoredProduct> {
    let sorted = {
        let values: Vec<Option<SortValue<'_>>> = items
            .iter()
            .map(|item| match key {
                SortKey::Field(field) => Some(field.value(&item.product)),
                SortKey::Relevance => None,
            })
            .collect();
        let scores: Vec<f64> = items.iter().map(|item| item.score.unwrap_or(0.0)).collect();

        merge_sort_by((0..items.len()).collect(), &mut |a: &usize, b: &usize| {
            let ord = match (&values[*a], &values[*b]) {
                (Some(va), Some(vb)) => va.compare(vb),
                _ => scores[*a].total_cmp(&scores[*b]),
            };
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        })
    };

    let mut slots: Vec<Option<ScoredProduct>> = items.into_iter().map(Some).collect();
    sorted
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

/// Top-down stable merge sort.
///
/// Unlike `slice::sort_by`, this never panics when the comparator is not a
/// total order, which the instant comparison is not once a malformed
/// timestamp is involved.
pub(crate) fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}

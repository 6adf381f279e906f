//! Product catalog module.
//!
//! Contains the queried entity and its timestamp type.

mod product;

pub use product::{Product, ProductStatus, Timestamp};

//! Product catalog (read-only).
//!
//! The catalog is supplied once at startup and never mutated. It answers the
//! lookups the cart and the storefront view need: full listing, category
//! filtering, and id resolution.

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{CategoryFilter, Product};

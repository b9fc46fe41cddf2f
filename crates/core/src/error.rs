//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a recoverable value handed back to the caller; none of them
/// leaves the cart or catalog in a partially-mutated state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A product id was not present in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Checkout was attempted while the cart held no lines.
    #[error("cannot check out an empty cart")]
    EmptyCartCheckout,

    /// A value failed validation (e.g. malformed catalog input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Whether the error is informational and should be shown to the shopper
    /// rather than logged as a fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::UnknownProduct(_) | Self::EmptyCartCheckout)
    }
}

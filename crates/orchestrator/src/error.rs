//! Orchestrator error types.
//!
//! Upstream failures are not errors here; they are [`crate::Outcome`]
//! variants. These types cover rule violations in the caller's input.

use thiserror::Error;

/// Reasons an order request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Orders must be for at least one unit.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// The inventory service reports fewer units than requested.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// `unit price × quantity` does not fit in the money representation.
    #[error("Order total overflows for quantity {quantity}")]
    TotalOverflow { quantity: u32 },
}

/// A product catalog definition could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// An entry is not of the form `<id>=<name>`.
    #[error("Invalid catalog entry '{0}', expected '<id>=<name>'")]
    InvalidEntry(String),

    /// The same product id appears twice.
    #[error("Duplicate catalog entry for product {0}")]
    DuplicateProduct(i64),
}

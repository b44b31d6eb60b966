//! # Error Types
//!
//! Domain-specific error types for refill-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  refill-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  refill-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures (wraps CoreError)             │
//! │                                                                         │
//! │  refill-api errors (in app)                                            │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::stock::StockShortfall;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is reported to the user before any mutation happens; none of
/// them is retried automatically.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale line references an item that does not exist.
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// The sale's customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// Editing a sale that no longer exists.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Delivery record does not exist.
    #[error("Delivery not found: {0}")]
    DeliveryNotFound(i64),

    /// Not enough stock to complete the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Save sale (5 × Slim 5gal, Completed)
    ///      │
    ///      ▼
    /// Baseline stock after reverting the old sale: 2
    ///      │
    ///      ▼
    /// InsufficientStock { item: "Slim 5gal", available: 2, needed: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 2 Slim 5gal in stock (5 needed)"
    /// ```
    #[error("Insufficient stock for {item_name} (#{item_id}): available {available}, needed {needed}")]
    InsufficientStock {
        item_id: i64,
        item_name: String,
        available: i64,
        needed: i64,
    },

    /// New sales cannot be recorded against an archived customer.
    #[error("Customer {0} is archived")]
    CustomerArchived(i64),

    /// Delivery status can only move forward.
    #[error("Delivery {delivery_id} cannot go from {from} to {to}")]
    InvalidDeliveryTransition {
        delivery_id: i64,
        from: String,
        to: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Builds the error for a stock shortfall found by the reconciliation helper.
    pub fn from_shortfall(shortfall: StockShortfall, item_name: impl Into<String>) -> Self {
        match shortfall {
            StockShortfall::Missing { item_id } => CoreError::ItemNotFound(item_id),
            StockShortfall::Insufficient {
                item_id,
                available,
                needed,
            } => CoreError::InsufficientStock {
                item_id,
                item_name: item_name.into(),
                available,
                needed,
            },
        }
    }

    /// True for errors caused by the request content (as opposed to a
    /// missing sale/delivery being addressed).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::ItemNotFound(_)
                | CoreError::CustomerNotFound(_)
                | CoreError::CustomerArchived(_)
                | CoreError::InsufficientStock { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. phone number, email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Discount larger than the subtotal it applies to.
    #[error("discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { discount: i64, subtotal: i64 },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

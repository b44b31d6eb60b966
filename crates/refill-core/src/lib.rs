//! # refill-core: Pure Business Logic for the Refill Station
//!
//! Domain types and rules for a water-refilling station back office, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Refill Station Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React SPA)                         │   │
//! │  │   Items ──► Customers ──► Sales form ──► Delivery dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    refill-api (axum)                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ refill-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  draft  │ │  stock  │ │  query  │ │   │
//! │  │   │  Item   │ │  Money  │ │SaleDraft│ │ check / │ │ filter/ │ │   │
//! │  │   │  Sale   │ │         │ │ totals  │ │ apply   │ │  sort   │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              refill-db (SQLite + sale workflow)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Customer, Sale, Delivery)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level business rules
//! - [`draft`] - Sale form input and its validation
//! - [`totals`] - Subtotal / discount / total computation
//! - [`stock`] - Stock reconciliation helper (check, plan, apply)
//! - [`query`] - In-memory filtering and sorting of lists
//!
//! ## Example Usage
//!
//! ```rust
//! use refill_core::money::Money;
//! use refill_core::totals::SaleTotals;
//! use refill_core::types::SaleItemLine;
//!
//! let lines = vec![SaleItemLine { item_id: 1, quantity: 3, price_cents: 2500 }];
//! let totals = SaleTotals::compute(&lines, Money::from_cents(500)).unwrap();
//!
//! assert_eq!(totals.subtotal.cents(), 7500);
//! assert_eq!(totals.total.cents(), 7000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod query;
pub mod stock;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{DraftLine, SaleDraft, ValidatedSale};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use stock::{StockPlan, StockShortfall, StockSnapshot};
pub use totals::SaleTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines in a single sale.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity on a single sale line.
///
/// Guards against typing 10000 instead of 10 on the sales form.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Highest accepted unit price, in centavos (₱10,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Upper bound on an item's stock count and on a single manual adjustment.
pub const MAX_STOCK_LEVEL: i64 = 1_000_000_000;

/// Prefix of human-readable invoice ids (`INV-000042`).
pub const INVOICE_PREFIX: &str = "INV-";

/// Formats the invoice id for a sale id.
///
/// ```rust
/// assert_eq!(refill_core::invoice_id_for(42), "INV-000042");
/// ```
pub fn invoice_id_for(sale_id: i64) -> String {
    format!("{}{:06}", INVOICE_PREFIX, sale_id)
}

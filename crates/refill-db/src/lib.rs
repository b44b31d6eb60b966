//! # refill-db: Database Layer for the Refill Station
//!
//! SQLite storage for the catalog, customer directory, sale ledger and
//! delivery dispatch, plus the transactional sale workflow that keeps them
//! consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Refill Station Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     refill-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  SaleWorkflow │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (workflow.rs) │    │  (embedded)  │  │   │
//! │  │   │               │    │       │       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  Repositories │    │ 001_init.sql │  │   │
//! │  │   │               │    │ item customer │    │              │  │   │
//! │  │   │               │    │ sale delivery │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (refill.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Item, customer, sale and delivery repositories
//! - [`workflow`] - Sale create / edit / delete as one transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use refill_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("refill.db")).await?;
//!
//! let outcome = db.sale_workflow().save_sale(&draft, Some("cashier")).await?;
//! println!("{} saved", outcome.sale.invoice_id);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::delivery::DeliveryRepository;
pub use repository::item::ItemRepository;
pub use repository::sale::SaleRepository;
pub use workflow::{DeleteOutcome, SaleOutcome, SaleWorkflow};

//! # Repository Module
//!
//! Database repository implementations for the refill station.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  API handler                                                           │
//! │       │  db.items().adjust_stock(3, -2)                                │
//! │       ▼                                                                 │
//! │  ItemRepository  (owns a pool clone, one statement or tx per call)     │
//! │       │                                                                 │
//! │       │  pub(crate) helpers taking an executor                         │
//! │       ▼                                                                 │
//! │  fetch_item(&mut *tx, id) ... ◄── also used by SaleWorkflow inside     │
//! │                                   its single transaction               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Catalog CRUD and stock deltas
//! - [`CustomerRepository`](customer::CustomerRepository) - Directory and archival
//! - [`SaleRepository`](sale::SaleRepository) - Ledger reads
//! - [`DeliveryRepository`](delivery::DeliveryRepository) - Dispatch dashboard

pub mod customer;
pub mod delivery;
pub mod item;
pub mod sale;

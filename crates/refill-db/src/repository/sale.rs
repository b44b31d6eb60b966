//! # Sale Repository
//!
//! Storage of the sale ledger.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE  (SaleWorkflow::save_sale, no editingSaleId)                │
//! │     └── id = MAX(id) + 1, invoice INV-000042                           │
//! │                                                                         │
//! │  2. EDIT    (SaleWorkflow::save_sale, editingSaleId set)               │
//! │     └── overwrite in place, id / invoice / created_at kept             │
//! │                                                                         │
//! │  3. DELETE  (SaleWorkflow::delete_sale)                                │
//! │     └── stock restored if Completed, delivery removed                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes only happen through the workflow's transaction; this repository
//! exposes reads. Line items live in the `items` column as a JSON array.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use refill_core::{
    CustomerType, PaymentMethod, Sale, SaleItemLine, SaleStatus, TransactionType,
};

// =============================================================================
// Row mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    invoice_id: String,
    date: DateTime<Utc>,
    customer_id: i64,
    customer_type: CustomerType,
    transaction_type: TransactionType,
    delivery_type: Option<String>,
    items: Json<Vec<SaleItemLine>>,
    subtotal_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    payment_method: PaymentMethod,
    status: SaleStatus,
    notes: Option<String>,
    recorded_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            invoice_id: row.invoice_id,
            date: row.date,
            customer_id: row.customer_id,
            customer_type: row.customer_type,
            transaction_type: row.transaction_type,
            delivery_type: row.delivery_type,
            items: row.items.0,
            subtotal_cents: row.subtotal_cents,
            discount_cents: row.discount_cents,
            total_cents: row.total_cents,
            payment_method: row.payment_method,
            status: row.status,
            notes: row.notes,
            recorded_by: row.recorded_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Executor-level helpers (used by the sale workflow)
// =============================================================================

pub(crate) async fn fetch_sale(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> DbResult<Option<Sale>> {
    let row = sqlx::query_as::<_, SaleRow>(
        r#"
        SELECT id, invoice_id, date, customer_id, customer_type, transaction_type,
               delivery_type, items, subtotal_cents, discount_cents, total_cents,
               payment_method, status, notes, recorded_by, created_at, updated_at
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Sale::from))
}

/// Next sale id: one past the highest, or 1 for an empty ledger.
pub(crate) async fn next_sale_id(conn: impl Executor<'_, Database = Sqlite>) -> DbResult<i64> {
    let id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM sales")
        .fetch_one(conn)
        .await?;
    Ok(id)
}

pub(crate) async fn insert_sale(
    conn: impl Executor<'_, Database = Sqlite>,
    sale: &Sale,
) -> DbResult<()> {
    debug!(sale_id = sale.id, invoice = %sale.invoice_id, "Inserting sale");

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, invoice_id, date, customer_id, customer_type, transaction_type,
            delivery_type, items, subtotal_cents, discount_cents, total_cents,
            payment_method, status, notes, recorded_by, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10, ?11,
            ?12, ?13, ?14, ?15, ?16, ?17
        )
        "#,
    )
    .bind(sale.id)
    .bind(&sale.invoice_id)
    .bind(sale.date)
    .bind(sale.customer_id)
    .bind(sale.customer_type)
    .bind(sale.transaction_type)
    .bind(&sale.delivery_type)
    .bind(Json(&sale.items))
    .bind(sale.subtotal_cents)
    .bind(sale.discount_cents)
    .bind(sale.total_cents)
    .bind(sale.payment_method)
    .bind(sale.status)
    .bind(&sale.notes)
    .bind(&sale.recorded_by)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Overwrites every mutable column. Identity and `created_at` are kept.
pub(crate) async fn update_sale(
    conn: impl Executor<'_, Database = Sqlite>,
    sale: &Sale,
) -> DbResult<bool> {
    debug!(sale_id = sale.id, "Updating sale");

    let result = sqlx::query(
        r#"
        UPDATE sales SET
            date = ?2,
            customer_id = ?3,
            customer_type = ?4,
            transaction_type = ?5,
            delivery_type = ?6,
            items = ?7,
            subtotal_cents = ?8,
            discount_cents = ?9,
            total_cents = ?10,
            payment_method = ?11,
            status = ?12,
            notes = ?13,
            recorded_by = ?14,
            updated_at = ?15
        WHERE id = ?1
        "#,
    )
    .bind(sale.id)
    .bind(sale.date)
    .bind(sale.customer_id)
    .bind(sale.customer_type)
    .bind(sale.transaction_type)
    .bind(&sale.delivery_type)
    .bind(Json(&sale.items))
    .bind(sale.subtotal_cents)
    .bind(sale.discount_cents)
    .bind(sale.total_cents)
    .bind(sale.payment_method)
    .bind(sale.status)
    .bind(&sale.notes)
    .bind(&sale.recorded_by)
    .bind(sale.updated_at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_sale_row(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Repository
// =============================================================================

/// Read access to the sale ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, invoice_id, date, customer_id, customer_type, transaction_type,
                   delivery_type, items, subtotal_cents, discount_cents, total_cents,
                   payment_method, status, notes, recorded_by, created_at, updated_at
            FROM sales
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed sales");
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Sale>> {
        fetch_sale(&self.pool, id).await
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

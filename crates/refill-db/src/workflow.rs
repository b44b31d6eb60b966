//! # Sale Workflow
//!
//! Creates, edits and deletes sales while keeping item stock and the
//! optional delivery record consistent. Each call is one SQLite transaction:
//! either everything below commits or nothing does.
//!
//! ## save_sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleDraft                                                              │
//! │     │ validate()            fail → Validation, nothing opened           │
//! │     ▼                                                                   │
//! │  BEGIN                                                                  │
//! │     │ load previous sale (edit)          missing → SaleNotFound         │
//! │     │ load customer                      missing / archived → reject    │
//! │     │ load items, StockPlan::validate    short → InsufficientStock      │
//! │     ▼                                                                   │
//! │  stock:    release old reservation, reserve new (compare-and-adjust)    │
//! │  ledger:   INSERT (id = max + 1) or UPDATE in place                     │
//! │  delivery: create / keep / remove to match the transaction type         │
//! │     ▼                                                                   │
//! │  COMMIT → SaleOutcome { sale, delivery, items touched }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## delete_sale
//! ```text
//!  BEGIN → load sale (absent → no-op) → restore stock if Completed
//!        → remove delivery → remove sale → COMMIT
//! ```

use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::customer::{fetch_customer, refresh_order_stats};
use crate::repository::delivery::{
    delete_deliveries_for_sale, fetch_delivery_by_sale, insert_delivery, NewDelivery,
};
use crate::repository::item::{add_stock, fetch_items_by_ids, reserve_stock};
use crate::repository::sale::{
    delete_sale_row, fetch_sale, insert_sale, next_sale_id, update_sale,
};
use refill_core::stock::{quantities_by_item, StockPlan, StockSnapshot};
use refill_core::{
    invoice_id_for, CoreError, Customer, Delivery, DeliveryLine, Item, Sale, SaleDraft,
    ValidatedSale,
};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a successful save: the stored sale, its delivery (if any) and
/// the fresh state of every item whose stock the call touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub sale: Sale,
    pub delivery: Option<Delivery>,
    pub items: Vec<Item>,
}

/// Result of a delete. `removed` is false when the sale did not exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub sale_id: i64,
    pub removed: bool,
    pub items: Vec<Item>,
}

// =============================================================================
// Workflow
// =============================================================================

/// The only writer of the sale ledger.
#[derive(Debug, Clone)]
pub struct SaleWorkflow {
    pool: SqlitePool,
}

impl SaleWorkflow {
    pub fn new(pool: SqlitePool) -> Self {
        SaleWorkflow { pool }
    }

    /// Creates a sale, or edits the one named by `draft.editing_sale_id`.
    ///
    /// `actor` is the acting user from the auth context, stored in
    /// `recorded_by`.
    pub async fn save_sale(&self, draft: &SaleDraft, actor: Option<&str>) -> DbResult<SaleOutcome> {
        let validated = draft.validate().map_err(|err| {
            warn!(error = %err, "Sale draft rejected");
            DbError::from(err)
        })?;

        let mut tx = self.begin_write().await?;
        let outcome = match save_in_tx(&mut tx, &validated, actor).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    editing = ?validated.editing_sale_id,
                    error = %err,
                    "Sale save aborted"
                );
                return Err(err);
            }
        };
        tx.commit().await?;

        info!(
            sale_id = outcome.sale.id,
            invoice = %outcome.sale.invoice_id,
            status = ?outcome.sale.status,
            total = %outcome.sale.total(),
            items_touched = outcome.items.len(),
            delivery = outcome.delivery.as_ref().map(|d| d.id),
            "Sale saved"
        );
        Ok(outcome)
    }

    /// Deletes a sale and reverses its effects. Deleting an unknown id is a
    /// no-op.
    pub async fn delete_sale(&self, sale_id: i64) -> DbResult<DeleteOutcome> {
        let mut tx = self.begin_write().await?;

        let Some(sale) = fetch_sale(&mut *tx, sale_id).await? else {
            debug!(sale_id, "Delete of unknown sale ignored");
            return Ok(DeleteOutcome {
                sale_id,
                removed: false,
                items: Vec::new(),
            });
        };

        let plan = StockPlan::for_delete(&sale);
        apply_plan(&mut tx, &plan, &[]).await?;

        let deliveries = delete_deliveries_for_sale(&mut *tx, sale_id).await?;
        delete_sale_row(&mut *tx, sale_id).await?;
        refresh_order_stats(&mut *tx, sale.customer_id).await?;

        let items = fetch_items_by_ids(&mut tx, &plan.item_ids()).await?;
        tx.commit().await?;

        info!(
            sale_id,
            invoice = %sale.invoice_id,
            restored = plan.released().len(),
            deliveries,
            "Sale deleted"
        );
        Ok(DeleteOutcome {
            sale_id,
            removed: true,
            items,
        })
    }

    /// Opens the workflow transaction with `BEGIN IMMEDIATE`.
    ///
    /// The write lock is taken up front, so concurrent saves queue on the
    /// busy timeout instead of failing when a reader tries to upgrade.
    async fn begin_write(&self) -> DbResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}

// =============================================================================
// Transaction body
// =============================================================================

async fn save_in_tx(
    conn: &mut SqliteConnection,
    draft: &ValidatedSale,
    actor: Option<&str>,
) -> DbResult<SaleOutcome> {
    // 1. Previous snapshot
    let previous = match draft.editing_sale_id {
        Some(id) => Some(
            fetch_sale(&mut *conn, id)
                .await?
                .ok_or(CoreError::SaleNotFound(id))?,
        ),
        None => None,
    };

    // 2. Customer
    let customer = fetch_customer(&mut *conn, draft.customer_id)
        .await?
        .ok_or(CoreError::CustomerNotFound(draft.customer_id))?;
    let customer_unchanged = previous
        .as_ref()
        .is_some_and(|p| p.customer_id == customer.id);
    if customer.hidden && !customer_unchanged {
        return Err(CoreError::CustomerArchived(customer.id).into());
    }

    // 3. Stock baseline and validation against it
    let plan = StockPlan::for_save(previous.as_ref(), &draft.lines, draft.status);
    let mut ids = plan.item_ids();
    ids.extend(draft.lines.iter().map(|l| l.item_id));
    ids.sort_unstable();
    ids.dedup();

    let items = fetch_items_by_ids(&mut *conn, &ids).await?;
    let snapshot = StockSnapshot::from_items(&items);

    if let Some(missing) = snapshot.find_missing(&draft.lines) {
        return Err(CoreError::from_shortfall(missing, "").into());
    }
    plan.validate(&snapshot).map_err(|shortfall| {
        let name = item_name(&items, shortfall.item_id());
        CoreError::from_shortfall(shortfall, name)
    })?;

    // 4. Stock
    apply_plan(&mut *conn, &plan, &items).await?;

    // 5. Ledger
    let sale = build_sale(&mut *conn, draft, previous.as_ref(), &customer, actor).await?;
    match previous {
        Some(_) => {
            if !update_sale(&mut *conn, &sale).await? {
                return Err(CoreError::SaleNotFound(sale.id).into());
            }
        }
        None => insert_sale(&mut *conn, &sale).await?,
    }
    refresh_order_stats(&mut *conn, sale.customer_id).await?;
    if let Some(prev) = previous.as_ref().filter(|p| p.customer_id != sale.customer_id) {
        refresh_order_stats(&mut *conn, prev.customer_id).await?;
    }

    // 6. Delivery
    let delivery = sync_delivery(&mut *conn, &sale, &customer, &items).await?;

    let touched = fetch_items_by_ids(&mut *conn, &plan.item_ids()).await?;
    Ok(SaleOutcome {
        sale,
        delivery,
        items: touched,
    })
}

fn item_name(items: &[Item], item_id: i64) -> String {
    items
        .iter()
        .find(|i| i.id == item_id)
        .map(|i| i.name.clone())
        .unwrap_or_default()
}

/// Applies the plan's net per-item deltas. Decrements go through the
/// conditional update so a concurrent writer cannot overdraw stock.
async fn apply_plan(conn: &mut SqliteConnection, plan: &StockPlan, items: &[Item]) -> DbResult<()> {
    let released = quantities_by_item(plan.released());
    let reserved = quantities_by_item(plan.reserved());

    for (item_id, delta) in plan.net_deltas() {
        if delta > 0 {
            add_stock(&mut *conn, item_id, delta).await?;
        } else if !reserve_stock(&mut *conn, item_id, -delta).await? {
            let current = items
                .iter()
                .find(|i| i.id == item_id)
                .map(|i| i.current_stock)
                .unwrap_or(0);
            return Err(CoreError::InsufficientStock {
                item_id,
                item_name: item_name(items, item_id),
                available: current + released.get(&item_id).copied().unwrap_or(0),
                needed: reserved.get(&item_id).copied().unwrap_or(0),
            }
            .into());
        }
        debug!(item_id, delta, "Stock moved");
    }
    Ok(())
}

async fn build_sale(
    conn: &mut SqliteConnection,
    draft: &ValidatedSale,
    previous: Option<&Sale>,
    customer: &Customer,
    actor: Option<&str>,
) -> DbResult<Sale> {
    let now = Utc::now();
    let (id, invoice_id, created_at) = match previous {
        Some(prev) => (prev.id, prev.invoice_id.clone(), prev.created_at),
        None => {
            let id = next_sale_id(&mut *conn).await?;
            (id, invoice_id_for(id), now)
        }
    };

    let recorded_by = actor
        .map(str::to_string)
        .or_else(|| previous.and_then(|p| p.recorded_by.clone()));

    Ok(Sale {
        id,
        invoice_id,
        date: draft
            .date
            .or_else(|| previous.map(|p| p.date))
            .unwrap_or(now),
        customer_id: customer.id,
        customer_type: draft.customer_type.unwrap_or(customer.customer_type),
        transaction_type: draft.transaction_type,
        delivery_type: draft.delivery_type.clone(),
        items: draft.lines.clone(),
        subtotal_cents: draft.totals.subtotal.cents(),
        discount_cents: draft.totals.discount.cents(),
        total_cents: draft.totals.total.cents(),
        payment_method: draft.payment_method,
        status: draft.status,
        notes: draft.notes.clone(),
        recorded_by,
        created_at,
        updated_at: now,
    })
}

/// Keeps "a delivery exists iff the sale is a Delivery sale".
///
/// An existing delivery is left untouched on edit.
async fn sync_delivery(
    conn: &mut SqliteConnection,
    sale: &Sale,
    customer: &Customer,
    items: &[Item],
) -> DbResult<Option<Delivery>> {
    let existing = fetch_delivery_by_sale(&mut *conn, sale.id).await?;

    if !sale.is_delivery() {
        if existing.is_some() {
            let removed = delete_deliveries_for_sale(&mut *conn, sale.id).await?;
            debug!(sale_id = sale.id, removed, "Delivery removed after switch to walk-in");
        }
        return Ok(None);
    }

    if let Some(delivery) = existing {
        return Ok(Some(delivery));
    }

    let new = NewDelivery {
        sale_id: sale.id,
        customer_name: customer.name.clone(),
        address: customer.address.clone(),
        phone: customer.phone.clone(),
        items: sale
            .items
            .iter()
            .map(|line| DeliveryLine {
                name: item_name(items, line.item_id),
                quantity: line.quantity,
            })
            .collect(),
    };
    Ok(Some(insert_delivery(&mut *conn, &new).await?))
}

// =============================================================================
// Unit Tests
// =============================================================================

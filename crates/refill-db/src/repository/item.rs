//! # Item Repository
//!
//! Catalog CRUD and the stock primitives every workflow shares.
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ WRONG: Absolute update (read, compute, write back)             │
//! │     UPDATE items SET current_stock = 7 WHERE id = ?                │
//! │                                                                     │
//! │  ✅ Restore / manual adjust: additive, clamped                     │
//! │     SET current_stock = MIN(MAX(current_stock + delta, 0), cap)    │
//! │                                                                     │
//! │  ✅ Reserve: compare-and-adjust                                    │
//! │     SET current_stock = current_stock - qty                        │
//! │     WHERE id = ? AND current_stock >= qty                          │
//! │     0 rows affected → someone else took the stock first            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use refill_core::validation::{
    validate_item_update, validate_new_item, validate_quantity, validate_stock_delta,
    validate_stock_levels,
};
use refill_core::{Item, ItemUpdate, NewItem, MAX_STOCK_LEVEL};

// =============================================================================
// Executor-level helpers (shared with the sale workflow)
// =============================================================================

pub(crate) async fn fetch_item(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> DbResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, name, category, price_cents, uom,
               current_stock, min_stock, max_stock, created_at, updated_at
        FROM items
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(item)
}

/// Loads the given items; ids that don't exist are simply absent.
pub(crate) async fn fetch_items_by_ids(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> DbResult<Vec<Item>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, name, category, price_cents, uom, \
         current_stock, min_stock, max_stock, created_at, updated_at \
         FROM items WHERE id IN (",
    );
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");

    let items = qb.build_query_as::<Item>().fetch_all(&mut *conn).await?;
    Ok(items)
}

/// Adds `delta` to an item's stock, clamping to `0..=MAX_STOCK_LEVEL`.
///
/// Callers keep `|delta| <= MAX_STOCK_LEVEL` so the sum stays an INTEGER.
/// Returns false if the item does not exist.
pub(crate) async fn add_stock(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    delta: i64,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET current_stock = MIN(MAX(current_stock + ?1, 0), ?4),
            updated_at = ?2
        WHERE id = ?3
        "#,
    )
    .bind(delta)
    .bind(Utc::now())
    .bind(id)
    .bind(MAX_STOCK_LEVEL)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Takes `quantity` units only if that many are on hand.
///
/// Returns false when the item is missing or short.
pub(crate) async fn reserve_stock(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    quantity: i64,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET current_stock = current_stock - ?1,
            updated_at = ?2
        WHERE id = ?3 AND current_stock >= ?1
        "#,
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the item catalog.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
/// let item = repo.create(&new_item).await?;
/// let item = repo.adjust_stock(item.id, 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists every item, by name.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category, price_cents, uom,
                   current_stock, min_stock, max_stock, created_at, updated_at
            FROM items
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Item>> {
        fetch_item(&self.pool, id).await
    }

    /// Items at or below their reorder threshold, emptiest first.
    pub async fn low_stock(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category, price_cents, uom,
                   current_stock, min_stock, max_stock, created_at, updated_at
            FROM items
            WHERE current_stock <= min_stock
            ORDER BY current_stock, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Creates a catalog item with its opening stock.
    pub async fn create(&self, new: &NewItem) -> DbResult<Item> {
        validate_new_item(new)?;
        debug!(name = %new.name, "Inserting item");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO items (
                name, category, price_cents, uom,
                current_stock, min_stock, max_stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(new.name.trim())
        .bind(new.category.trim())
        .bind(new.price_cents)
        .bind(new.uom.trim())
        .bind(new.initial_stock)
        .bind(new.min_stock)
        .bind(new.max_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(item_id = id, name = %new.name, stock = new.initial_stock, "Item created");

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Updates catalog fields. Stock is untouched.
    pub async fn update(&self, id: i64, update: &ItemUpdate) -> DbResult<Item> {
        validate_item_update(update)?;

        let mut tx = self.pool.begin().await?;

        let mut item = fetch_item(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))?;
        update.apply_to(&mut item);
        validate_stock_levels(item.min_stock, item.max_stock)?;
        item.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                uom = ?5,
                min_stock = ?6,
                max_stock = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(&item.uom)
        .bind(item.min_stock)
        .bind(item.max_stock)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await?;

        // Re-read so current_stock reflects any concurrent delta
        let item = fetch_item(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))?;
        tx.commit().await?;

        info!(item_id = id, "Item updated");
        Ok(item)
    }

    /// Manual inventory adjustment: additive delta, clamped at zero.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<Item> {
        validate_stock_delta(delta)?;
        debug!(item_id = id, delta, "Adjusting stock");

        if !add_stock(&self.pool, id, delta).await? {
            return Err(DbError::not_found("Item", id));
        }

        let item = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))?;
        info!(item_id = id, delta, stock = item.current_stock, "Stock adjusted");
        Ok(item)
    }

    /// Conditional decrement. `Ok(false)` when fewer than `quantity` are on hand.
    pub async fn try_reserve(&self, id: i64, quantity: i64) -> DbResult<bool> {
        validate_quantity(quantity)?;

        if reserve_stock(&self.pool, id, quantity).await? {
            return Ok(true);
        }
        if self.get(id).await?.is_none() {
            return Err(DbError::not_found("Item", id));
        }
        Ok(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_support::{new_item, test_db};
    use crate::DbError;
    use refill_core::{CoreError, ItemUpdate, MAX_STOCK_LEVEL};

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let repo = db.items();

        let item = repo.create(&new_item("Round 5gal refill", 2500, 45)).await.unwrap();
        assert_eq!(item.current_stock, 45);
        assert_eq!(item.price_cents, 2500);

        let fetched = repo.get(item.id).await.unwrap().unwrap();
        assert_eq!(fetched, item);
        assert!(repo.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid() {
        let db = test_db().await;
        let mut bad = new_item("", 2500, 0);
        let err = db.items().create(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

        bad.name = "Cap".to_string();
        bad.price_cents = -1;
        assert!(db.items().create(&bad).await.is_err());
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let db = test_db().await;
        let repo = db.items();
        let item = repo.create(&new_item("Slim 5gal refill", 2500, 30)).await.unwrap();

        let updated = repo
            .update(
                item.id,
                &ItemUpdate {
                    price_cents: Some(3000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_cents, 3000);
        assert_eq!(updated.current_stock, 30);

        let err = repo
            .update(
                item.id,
                &ItemUpdate {
                    min_stock: Some(500),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));

        assert!(repo.update(42, &ItemUpdate::default()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let db = test_db().await;
        let repo = db.items();
        let item = repo.create(&new_item("Cap", 500, 3)).await.unwrap();

        assert_eq!(repo.adjust_stock(item.id, 7).await.unwrap().current_stock, 10);
        assert_eq!(repo.adjust_stock(item.id, -25).await.unwrap().current_stock, 0);
        assert!(repo.adjust_stock(999, 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_adjust_stock_bounds() {
        let db = test_db().await;
        let repo = db.items();
        let item = repo.create(&new_item("Round 5gal refill", 2500, 45)).await.unwrap();

        for delta in [i64::MAX, i64::MIN, MAX_STOCK_LEVEL + 1] {
            let err = repo.adjust_stock(item.id, delta).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        }
        assert_eq!(repo.get(item.id).await.unwrap().unwrap().current_stock, 45);

        // Two maximal adjustments saturate instead of leaving the INTEGER range.
        repo.adjust_stock(item.id, MAX_STOCK_LEVEL).await.unwrap();
        let item = repo.adjust_stock(item.id, MAX_STOCK_LEVEL).await.unwrap();
        assert_eq!(item.current_stock, MAX_STOCK_LEVEL);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_try_reserve() {
        let db = test_db().await;
        let repo = db.items();
        let item = repo.create(&new_item("Seal", 100, 2)).await.unwrap();

        assert!(!repo.try_reserve(item.id, 5).await.unwrap());
        assert_eq!(repo.get(item.id).await.unwrap().unwrap().current_stock, 2);

        assert!(repo.try_reserve(item.id, 2).await.unwrap());
        assert_eq!(repo.get(item.id).await.unwrap().unwrap().current_stock, 0);

        assert!(repo.try_reserve(999, 1).await.is_err());
        assert!(repo.try_reserve(item.id, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_low_stock() {
        let db = test_db().await;
        let repo = db.items();
        repo.create(&new_item("Round 5gal refill", 2500, 45)).await.unwrap();
        let low = repo.create(&new_item("Dispenser", 45000, 1)).await.unwrap();

        let items = repo.low_stock().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, low.id);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}

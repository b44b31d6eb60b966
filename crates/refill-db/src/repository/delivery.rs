//! # Delivery Repository
//!
//! Dispatch records for Delivery sales, plus the dashboard's status and
//! location updates.
//!
//! ```text
//!   pending ──► in-progress ──► completed      (never backwards)
//! ```
//!
//! Creation and removal belong to the sale workflow; a delivery exists
//! exactly while its Delivery sale does.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use refill_core::{CoreError, Delivery, DeliveryLine, DeliveryStatus, GeoPoint};

// =============================================================================
// Row mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    id: i64,
    sale_id: i64,
    customer_name: String,
    address: String,
    phone: String,
    items: Json<Vec<DeliveryLine>>,
    status: DeliveryStatus,
    current_lat: Option<f64>,
    current_lng: Option<f64>,
    dest_lat: Option<f64>,
    dest_lng: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn point(lat: Option<f64>, lng: Option<f64>) -> Option<GeoPoint> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
        _ => None,
    }
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        Delivery {
            id: row.id,
            sale_id: row.sale_id,
            customer_name: row.customer_name,
            address: row.address,
            phone: row.phone,
            items: row.items.0,
            status: row.status,
            current_location: point(row.current_lat, row.current_lng),
            destination: point(row.dest_lat, row.dest_lng),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_DELIVERY: &str = r#"
    SELECT id, sale_id, customer_name, address, phone, items, status,
           current_lat, current_lng, dest_lat, dest_lng, created_at, updated_at
    FROM deliveries
"#;

/// Customer and item details frozen onto a new delivery slip.
#[derive(Debug, Clone)]
pub(crate) struct NewDelivery {
    pub sale_id: i64,
    pub customer_name: String,
    pub address: String,
    pub phone: String,
    pub items: Vec<DeliveryLine>,
}

// =============================================================================
// Executor-level helpers (used by the sale workflow)
// =============================================================================

pub(crate) async fn fetch_delivery(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> DbResult<Option<Delivery>> {
    let sql = format!("{SELECT_DELIVERY} WHERE id = ?1");
    let row = sqlx::query_as::<_, DeliveryRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Delivery::from))
}

pub(crate) async fn fetch_delivery_by_sale(
    conn: impl Executor<'_, Database = Sqlite>,
    sale_id: i64,
) -> DbResult<Option<Delivery>> {
    let sql = format!("{SELECT_DELIVERY} WHERE sale_id = ?1");
    let row = sqlx::query_as::<_, DeliveryRow>(&sql)
        .bind(sale_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Delivery::from))
}

pub(crate) async fn insert_delivery(
    conn: &mut SqliteConnection,
    new: &NewDelivery,
) -> DbResult<Delivery> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO deliveries (
            sale_id, customer_name, address, phone, items, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        "#,
    )
    .bind(new.sale_id)
    .bind(&new.customer_name)
    .bind(&new.address)
    .bind(&new.phone)
    .bind(Json(&new.items))
    .bind(DeliveryStatus::Pending)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    debug!(delivery_id = id, sale_id = new.sale_id, "Delivery created");

    fetch_delivery(&mut *conn, id)
        .await?
        .ok_or_else(|| CoreError::DeliveryNotFound(id).into())
}

/// Removes the delivery of a sale. Returns how many rows went away.
pub(crate) async fn delete_deliveries_for_sale(
    conn: impl Executor<'_, Database = Sqlite>,
    sale_id: i64,
) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM deliveries WHERE sale_id = ?1")
        .bind(sale_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository backing the delivery dashboard.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryRepository { pool }
    }

    /// Lists deliveries, newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<DeliveryStatus>) -> DbResult<Vec<Delivery>> {
        let rows = match status {
            Some(status) => {
                let sql = format!("{SELECT_DELIVERY} WHERE status = ?1 ORDER BY id DESC");
                sqlx::query_as::<_, DeliveryRow>(&sql)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{SELECT_DELIVERY} ORDER BY id DESC");
                sqlx::query_as::<_, DeliveryRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Delivery::from).collect())
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Delivery>> {
        fetch_delivery(&self.pool, id).await
    }

    pub async fn get_by_sale_id(&self, sale_id: i64) -> DbResult<Option<Delivery>> {
        fetch_delivery_by_sale(&self.pool, sale_id).await
    }

    /// Moves a delivery forward. Same status is a no-op; backwards is rejected.
    pub async fn update_status(&self, id: i64, next: DeliveryStatus) -> DbResult<Delivery> {
        let mut tx = self.pool.begin().await?;

        let current = fetch_delivery(&mut *tx, id)
            .await?
            .ok_or(CoreError::DeliveryNotFound(id))?;

        if current.status == next {
            return Ok(current);
        }
        if !current.status.can_transition_to(next) {
            return Err(CoreError::InvalidDeliveryTransition {
                delivery_id: id,
                from: current.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        sqlx::query("UPDATE deliveries SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(next)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let delivery = fetch_delivery(&mut *tx, id)
            .await?
            .ok_or(CoreError::DeliveryNotFound(id))?;
        tx.commit().await?;

        info!(delivery_id = id, from = %current.status, to = %next, "Delivery status changed");
        Ok(delivery)
    }

    /// Records the rider's last known position.
    pub async fn update_location(&self, id: i64, location: GeoPoint) -> DbResult<Delivery> {
        let result = sqlx::query(
            "UPDATE deliveries SET current_lat = ?1, current_lng = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(location.lat)
        .bind(location.lng)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::DeliveryNotFound(id).into());
        }

        debug!(delivery_id = id, lat = location.lat, lng = location.lng, "Location updated");
        self.get(id)
            .await?
            .ok_or_else(|| CoreError::DeliveryNotFound(id).into())
    }

    /// Sets or clears the drop-off coordinates.
    pub async fn set_destination(
        &self,
        id: i64,
        destination: Option<GeoPoint>,
    ) -> DbResult<Delivery> {
        let result = sqlx::query(
            "UPDATE deliveries SET dest_lat = ?1, dest_lng = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(destination.map(|p| p.lat))
        .bind(destination.map(|p| p.lng))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::DeliveryNotFound(id).into());
        }

        self.get(id)
            .await?
            .ok_or_else(|| CoreError::DeliveryNotFound(id).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_support::{draft, new_customer, new_item, test_db};
    use crate::{Database, DbError};
    use refill_core::{CoreError, Delivery, DeliveryStatus, GeoPoint, SaleStatus, TransactionType};

    async fn delivery_sale(db: &Database) -> Delivery {
        let customer = db.customers().create(&new_customer("Garcia Family")).await.unwrap();
        let item = db.items().create(&new_item("Round 5gal refill", 2500, 20)).await.unwrap();

        let mut d = draft(customer.id, &[(item.id, 2)], SaleStatus::Completed);
        d.transaction_type = Some(TransactionType::Delivery);
        db.sale_workflow()
            .save_sale(&d, None)
            .await
            .unwrap()
            .delivery
            .unwrap()
    }

    #[tokio::test]
    async fn test_status_moves_forward_only() {
        let db = test_db().await;
        let repo = db.deliveries();
        let delivery = delivery_sale(&db).await;
        assert_eq!(delivery.status, DeliveryStatus::Pending);

        let moved = repo
            .update_status(delivery.id, DeliveryStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(moved.status, DeliveryStatus::InProgress);

        // Same status is accepted
        repo.update_status(delivery.id, DeliveryStatus::InProgress)
            .await
            .unwrap();

        let err = repo
            .update_status(delivery.id, DeliveryStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidDeliveryTransition { .. })
        ));

        repo.update_status(delivery.id, DeliveryStatus::Completed)
            .await
            .unwrap();
        let done = repo.list(Some(DeliveryStatus::Completed)).await.unwrap();
        assert_eq!(done.len(), 1);
        assert!(repo.list(Some(DeliveryStatus::Pending)).await.unwrap().is_empty());

        assert!(repo
            .update_status(404, DeliveryStatus::Completed)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_location_and_destination() {
        let db = test_db().await;
        let repo = db.deliveries();
        let delivery = delivery_sale(&db).await;
        assert!(delivery.current_location.is_none());

        let here = GeoPoint { lat: 14.6507, lng: 121.0495 };
        let updated = repo.update_location(delivery.id, here).await.unwrap();
        assert_eq!(updated.current_location, Some(here));

        let dest = GeoPoint { lat: 14.6760, lng: 121.0437 };
        let updated = repo.set_destination(delivery.id, Some(dest)).await.unwrap();
        assert_eq!(updated.destination, Some(dest));
        assert_eq!(updated.current_location, Some(here));

        let cleared = repo.set_destination(delivery.id, None).await.unwrap();
        assert!(cleared.destination.is_none());

        assert!(repo.update_location(404, here).await.unwrap_err().is_not_found());
        let by_sale = repo.get_by_sale_id(delivery.sale_id).await.unwrap().unwrap();
        assert_eq!(by_sale.id, delivery.id);
    }
}

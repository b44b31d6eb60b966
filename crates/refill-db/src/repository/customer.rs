//! # Customer Repository
//!
//! The customer directory. Customers are archived (`hidden = 1`), never
//! deleted, so historical sales keep resolving.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use refill_core::validation::{validate_customer_update, validate_new_customer};
use refill_core::{Customer, CustomerStatus, CustomerUpdate, NewCustomer};

pub(crate) async fn fetch_customer(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> DbResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, phone, email, address, customer_type, status,
               hidden, total_orders, last_order, created_at
        FROM customers
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(customer)
}

/// Recomputes `total_orders` and `last_order` from the sale ledger.
///
/// Run inside the sale workflow transaction after any ledger write that
/// involves the customer.
pub(crate) async fn refresh_order_stats(
    conn: impl Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE customers SET
            total_orders = (SELECT COUNT(*) FROM sales WHERE customer_id = ?1),
            last_order = (SELECT MAX(date) FROM sales WHERE customer_id = ?1)
        WHERE id = ?1
        "#,
    )
    .bind(customer_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Repository for the customer directory.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists customers by name. Archived ones only when asked for.
    pub async fn list(&self, include_hidden: bool) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, email, address, customer_type, status,
                   hidden, total_orders, last_order, created_at
            FROM customers
            WHERE ?1 OR hidden = 0
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .bind(include_hidden)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), include_hidden, "Listed customers");
        Ok(customers)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Customer>> {
        fetch_customer(&self.pool, id).await
    }

    pub async fn create(&self, new: &NewCustomer) -> DbResult<Customer> {
        validate_new_customer(new)?;

        let email = new
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                name, phone, email, address, customer_type, status,
                hidden, total_orders, last_order, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, NULL, ?7)
            "#,
        )
        .bind(new.name.trim())
        .bind(new.phone.trim())
        .bind(email)
        .bind(new.address.trim())
        .bind(new.customer_type)
        .bind(CustomerStatus::Active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(customer_id = id, name = %new.name, "Customer created");

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    pub async fn update(&self, id: i64, update: &CustomerUpdate) -> DbResult<Customer> {
        validate_customer_update(update)?;

        let mut tx = self.pool.begin().await?;

        let mut customer = fetch_customer(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;
        update.apply_to(&mut customer);

        sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                email = ?4,
                address = ?5,
                customer_type = ?6,
                status = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.customer_type)
        .bind(customer.status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(customer_id = id, "Customer updated");
        Ok(customer)
    }

    /// Soft-deletes a customer.
    pub async fn archive(&self, id: i64) -> DbResult<Customer> {
        self.set_hidden(id, true).await
    }

    /// Brings an archived customer back into selection lists.
    pub async fn restore(&self, id: i64) -> DbResult<Customer> {
        self.set_hidden(id, false).await
    }

    async fn set_hidden(&self, id: i64, hidden: bool) -> DbResult<Customer> {
        let result = sqlx::query("UPDATE customers SET hidden = ?1 WHERE id = ?2")
            .bind(hidden)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        info!(customer_id = id, hidden, "Customer visibility changed");
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{new_customer, test_db};
    use refill_core::{CustomerType, CustomerUpdate};

    #[tokio::test]
    async fn test_create_and_update() {
        let db = test_db().await;
        let repo = db.customers();

        let created = repo.create(&new_customer("Santos Household")).await.unwrap();
        assert!(!created.hidden);
        assert_eq!(created.total_orders, 0);
        assert_eq!(created.customer_type, CustomerType::Regular);

        let updated = repo
            .update(
                created.id,
                &CustomerUpdate {
                    customer_type: Some(CustomerType::Wholesale),
                    email: Some("santos@example.ph".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.customer_type, CustomerType::Wholesale);

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email.as_deref(), Some("santos@example.ph"));
        assert_eq!(fetched.customer_type, CustomerType::Wholesale);
    }

    #[tokio::test]
    async fn test_archive_and_restore() {
        let db = test_db().await;
        let repo = db.customers();
        let kept = repo.create(&new_customer("Bautista Office")).await.unwrap();
        let gone = repo.create(&new_customer("Closed Store")).await.unwrap();

        assert!(repo.archive(gone.id).await.unwrap().hidden);

        let active = repo.list(false).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);

        assert!(!repo.restore(gone.id).await.unwrap().hidden);
        assert_eq!(repo.list(false).await.unwrap().len(), 2);

        assert!(repo.archive(999).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_phone() {
        let db = test_db().await;
        let mut customer = new_customer("Reyes");
        customer.phone = "n/a".to_string();
        assert!(db.customers().create(&customer).await.is_err());
    }
}

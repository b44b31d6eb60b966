//! Fixtures shared by the in-crate tests.

use crate::{Database, DbConfig};
use refill_core::{
    CustomerType, DraftLine, NewCustomer, NewItem, PaymentMethod, SaleDraft, SaleStatus,
    TransactionType,
};

/// Fresh in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Catalog item with min 5 / max 200 stock levels.
pub fn new_item(name: &str, price_cents: i64, stock: i64) -> NewItem {
    NewItem {
        name: name.to_string(),
        category: "Refill".to_string(),
        price_cents,
        uom: "gallon".to_string(),
        initial_stock: stock,
        min_stock: 5,
        max_stock: 200,
    }
}

pub fn new_customer(name: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        phone: "0917 555 0101".to_string(),
        email: None,
        address: "12 Mabini St, Quezon City".to_string(),
        customer_type: CustomerType::Regular,
    }
}

/// Walk-in cash draft, every line priced at ₱25.00.
pub fn draft(customer_id: i64, lines: &[(i64, i64)], status: SaleStatus) -> SaleDraft {
    SaleDraft {
        customer_id: Some(customer_id),
        transaction_type: Some(TransactionType::WalkIn),
        items: lines
            .iter()
            .map(|&(item_id, quantity)| DraftLine {
                item_id: Some(item_id),
                quantity,
                price_cents: 2500,
            })
            .collect(),
        payment_method: PaymentMethod::Cash,
        status,
        ..Default::default()
    }
}

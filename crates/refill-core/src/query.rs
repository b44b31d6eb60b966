//! # List Queries
//!
//! Filtering and sorting of in-memory lists for the list screens
//! (items, customers, sales). Deserializable straight from URL query
//! parameters.
//!
//! ```rust
//! use refill_core::query::{SaleQuery, SortDirection};
//!
//! let q = SaleQuery { search: Some("inv-0000".into()), ..Default::default() };
//! assert_eq!(q.direction, SortDirection::Desc); // newest first
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Customer, CustomerType, Item, Sale, SaleStatus, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

fn normalized(search: &Option<String>) -> String {
    search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SaleSort {
    #[default]
    Date,
    Total,
    Invoice,
}

fn desc() -> SortDirection {
    SortDirection::Desc
}

/// Sales list filter. Defaults to every sale, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleQuery {
    /// Matches invoice id and notes.
    pub search: Option<String>,
    pub status: Option<SaleStatus>,
    pub transaction_type: Option<TransactionType>,
    pub customer_id: Option<i64>,
    pub sort: SaleSort,
    #[serde(default = "desc")]
    pub direction: SortDirection,
}

impl Default for SaleQuery {
    fn default() -> Self {
        SaleQuery {
            search: None,
            status: None,
            transaction_type: None,
            customer_id: None,
            sort: SaleSort::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SaleQuery {
    pub fn matches(&self, sale: &Sale) -> bool {
        let needle = normalized(&self.search);
        (contains_ci(&sale.invoice_id, &needle)
            || sale
                .notes
                .as_deref()
                .is_some_and(|notes| contains_ci(notes, &needle)))
            && self.status.map_or(true, |s| sale.status == s)
            && self
                .transaction_type
                .map_or(true, |t| sale.transaction_type == t)
            && self.customer_id.map_or(true, |c| sale.customer_id == c)
    }

    /// Filters and sorts. Ties fall back to id so the order is stable.
    pub fn apply(&self, sales: Vec<Sale>) -> Vec<Sale> {
        let mut out: Vec<Sale> = sales.into_iter().filter(|s| self.matches(s)).collect();
        out.sort_by(|a, b| {
            let primary = match self.sort {
                SaleSort::Date => a.date.cmp(&b.date),
                SaleSort::Total => a.total_cents.cmp(&b.total_cents),
                SaleSort::Invoice => a.invoice_id.cmp(&b.invoice_id),
            };
            self.direction.apply(primary.then(a.id.cmp(&b.id)))
        });
        out
    }
}

// =============================================================================
// Items
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ItemSort {
    #[default]
    Name,
    Stock,
    Price,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemQuery {
    /// Matches name and category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub low_stock_only: bool,
    pub sort: ItemSort,
    pub direction: SortDirection,
}

impl ItemQuery {
    pub fn matches(&self, item: &Item) -> bool {
        let needle = normalized(&self.search);
        (contains_ci(&item.name, &needle) || contains_ci(&item.category, &needle))
            && self
                .category
                .as_deref()
                .map_or(true, |c| item.category.eq_ignore_ascii_case(c.trim()))
            && (!self.low_stock_only || item.is_low_stock())
    }

    pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        let mut out: Vec<Item> = items.into_iter().filter(|i| self.matches(i)).collect();
        out.sort_by(|a, b| {
            let primary = match self.sort {
                ItemSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                ItemSort::Stock => a.current_stock.cmp(&b.current_stock),
                ItemSort::Price => a.price_cents.cmp(&b.price_cents),
            };
            self.direction.apply(primary.then(a.id.cmp(&b.id)))
        });
        out
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Customer list filter. Archived customers are left out unless asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerQuery {
    /// Matches name, phone and email.
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub include_hidden: bool,
    pub direction: SortDirection,
}

impl CustomerQuery {
    pub fn matches(&self, customer: &Customer) -> bool {
        let needle = normalized(&self.search);
        (contains_ci(&customer.name, &needle)
            || contains_ci(&customer.phone, &needle)
            || customer
                .email
                .as_deref()
                .is_some_and(|e| contains_ci(e, &needle)))
            && self
                .customer_type
                .map_or(true, |t| customer.customer_type == t)
            && (self.include_hidden || !customer.hidden)
    }

    /// Filters and sorts by name.
    pub fn apply(&self, customers: Vec<Customer>) -> Vec<Customer> {
        let mut out: Vec<Customer> = customers
            .into_iter()
            .filter(|c| self.matches(c))
            .collect();
        out.sort_by(|a, b| {
            let primary = a.name.to_lowercase().cmp(&b.name.to_lowercase());
            self.direction.apply(primary.then(a.id.cmp(&b.id)))
        });
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerStatus, PaymentMethod};
    use chrono::{Duration, Utc};

    fn sale(id: i64, total: i64, days_ago: i64, status: SaleStatus) -> Sale {
        let now = Utc::now();
        Sale {
            id,
            invoice_id: crate::invoice_id_for(id),
            date: now - Duration::days(days_ago),
            customer_id: id % 2 + 1,
            customer_type: CustomerType::Regular,
            transaction_type: TransactionType::WalkIn,
            delivery_type: None,
            items: vec![],
            subtotal_cents: total,
            discount_cents: 0,
            total_cents: total,
            payment_method: PaymentMethod::Cash,
            status,
            notes: (id == 2).then(|| "Gate code 1234".to_string()),
            recorded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(id: i64, name: &str, category: &str, stock: i64) -> Item {
        let now = Utc::now();
        Item {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price_cents: 1000 * id,
            uom: "pc".to_string(),
            current_stock: stock,
            min_stock: 10,
            max_stock: 100,
            created_at: now,
            updated_at: now,
        }
    }

    fn customer(id: i64, name: &str, hidden: bool) -> Customer {
        Customer {
            id,
            name: name.to_string(),
            phone: format!("0917 555 010{}", id),
            email: None,
            address: String::new(),
            customer_type: CustomerType::Regular,
            status: CustomerStatus::Active,
            hidden,
            total_orders: 0,
            last_order: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sales_default_newest_first() {
        let sales = vec![
            sale(1, 100, 3, SaleStatus::Completed),
            sale(2, 300, 1, SaleStatus::Pending),
            sale(3, 200, 2, SaleStatus::Completed),
        ];
        let ids: Vec<i64> = SaleQuery::default().apply(sales).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sales_filters() {
        let sales = vec![
            sale(1, 100, 3, SaleStatus::Completed),
            sale(2, 300, 1, SaleStatus::Pending),
            sale(3, 200, 2, SaleStatus::Completed),
        ];

        let q = SaleQuery {
            status: Some(SaleStatus::Completed),
            sort: SaleSort::Total,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        let ids: Vec<i64> = q.apply(sales.clone()).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let q = SaleQuery {
            search: Some("gate".to_string()),
            ..Default::default()
        };
        assert_eq!(q.apply(sales.clone()).len(), 1);

        let q = SaleQuery {
            search: Some("inv-000003".to_string()),
            ..Default::default()
        };
        assert_eq!(q.apply(sales)[0].id, 3);
    }

    #[test]
    fn test_items_low_stock_and_category() {
        let items = vec![
            item(1, "Round 5gal refill", "Refill", 40),
            item(2, "Slim 5gal refill", "Refill", 5),
            item(3, "Cap", "Accessory", 3),
        ];

        let q = ItemQuery {
            low_stock_only: true,
            ..Default::default()
        };
        let names: Vec<String> = q.apply(items.clone()).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Cap", "Slim 5gal refill"]);

        let q = ItemQuery {
            category: Some("refill".to_string()),
            sort: ItemSort::Stock,
            ..Default::default()
        };
        let ids: Vec<i64> = q.apply(items).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_customers_hidden_excluded_by_default() {
        let customers = vec![
            customer(1, "Santos Household", false),
            customer(2, "Archived Store", true),
            customer(3, "Bautista Office", false),
        ];

        let ids: Vec<i64> = CustomerQuery::default()
            .apply(customers.clone())
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);

        let q = CustomerQuery {
            include_hidden: true,
            search: Some("0102".to_string()),
            ..Default::default()
        };
        assert_eq!(q.apply(customers)[0].id, 2);
    }

    #[test]
    fn test_query_from_json_params() {
        let q: SaleQuery = serde_json::from_str(r#"{"status":"Pending"}"#).unwrap();
        assert_eq!(q.status, Some(SaleStatus::Pending));
        assert_eq!(q.direction, SortDirection::Desc);

        let q: CustomerQuery = serde_json::from_str(r#"{"type":"Wholesale"}"#).unwrap();
        assert_eq!(q.customer_type, Some(CustomerType::Wholesale));
    }
}

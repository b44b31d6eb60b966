//! # Domain Types
//!
//! Core domain types used throughout the refill station.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Sale       │   │    Delivery     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  items[]        │◄──│  sale_id (FK)   │       │
//! │  │  price_cents    │   │  invoice_id     │   │  items (names)  │       │
//! │  │  current_stock  │   │  status         │   │  status         │       │
//! │  └─────────────────┘   │  customer_id ───┼─┐ └─────────────────┘       │
//! │                        └─────────────────┘ │                            │
//! │                        ┌─────────────────┐ │                            │
//! │                        │    Customer     │◄┘                            │
//! │                        │  hidden (soft)  │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire format is camelCase JSON; enum spellings follow what the frontend
//! renders (`"Walk-in"`, `"Completed"`, `"in-progress"`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A catalog/inventory product (refill, container, cap, dispenser...).
///
/// `current_stock` never goes negative; every mutation clamps at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// Unit sale price in centavos.
    pub price_cents: i64,
    /// Unit of measure ("gallon", "pc", "set").
    pub uom: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// At or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

/// Input for creating an item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub uom: String,
    #[serde(default)]
    pub initial_stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default)]
    pub max_stock: i64,
}

/// Partial update of an item's catalog fields.
///
/// Stock is deliberately absent: it only moves through additive deltas.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub uom: Option<String>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
}

impl ItemUpdate {
    /// Applies the present fields on top of an existing item.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = &self.category {
            item.category = category.trim().to_string();
        }
        if let Some(price) = self.price_cents {
            item.price_cents = price;
        }
        if let Some(uom) = &self.uom {
            item.uom = uom.trim().to_string();
        }
        if let Some(min) = self.min_stock {
            item.min_stock = min;
        }
        if let Some(max) = self.max_stock {
            item.max_stock = max;
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum CustomerType {
    #[default]
    Regular,
    Wholesale,
    Corporate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
}

/// A buyer.
///
/// Hidden customers are archived: excluded from selection lists, kept for the
/// sales that reference them. Never hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub status: CustomerStatus,
    pub hidden: bool,
    pub total_orders: i64,
    #[ts(as = "Option<String>")]
    pub last_order: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "type", default)]
    pub customer_type: CustomerType,
}

/// Partial update of a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub status: Option<CustomerStatus>,
}

impl CustomerUpdate {
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            customer.phone = phone.trim().to_string();
        }
        if let Some(email) = &self.email {
            let email = email.trim();
            customer.email = (!email.is_empty()).then(|| email.to_string());
        }
        if let Some(address) = &self.address {
            customer.address = address.trim().to_string();
        }
        if let Some(customer_type) = self.customer_type {
            customer.customer_type = customer_type;
        }
        if let Some(status) = self.status {
            customer.status = status;
        }
    }
}

// =============================================================================
// Sale Enums
// =============================================================================

/// Whether a sale has taken effect on inventory.
///
/// Only `Completed` sales hold stock; a `Pending` sale is recorded intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum SaleStatus {
    #[default]
    Pending,
    Completed,
}

/// How the goods leave the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum TransactionType {
    #[serde(rename = "Walk-in")]
    WalkIn,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Cash,
    GCash,
    Card,
    BankTransfer,
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a sale.
///
/// `price_cents` is the unit price captured when the line was saved; later
/// catalog price changes do not touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItemLine {
    pub item_id: i64,
    pub quantity: i64,
    pub price_cents: i64,
}

impl SaleItemLine {
    /// `price × quantity`, or `None` if it does not fit in an i64.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        Money::from_cents(self.price_cents).checked_mul_quantity(self.quantity)
    }
}

/// A sale transaction, aggregate root of the sale workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub invoice_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer_id: i64,
    /// Snapshot of the customer's type when the sale was saved.
    pub customer_type: CustomerType,
    pub transaction_type: TransactionType,
    pub delivery_type: Option<String>,
    pub items: Vec<SaleItemLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    /// Acting user supplied by the auth context.
    pub recorded_by: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == SaleStatus::Completed
    }

    #[inline]
    pub fn is_delivery(&self) -> bool {
        self.transaction_type == TransactionType::Delivery
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Lines currently holding stock (empty unless Completed).
    pub fn reserved_lines(&self) -> &[SaleItemLine] {
        if self.is_completed() {
            &self.items
        } else {
            &[]
        }
    }
}

// =============================================================================
// Delivery
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl DeliveryStatus {
    fn rank(self) -> u8 {
        match self {
            DeliveryStatus::Pending => 0,
            DeliveryStatus::InProgress => 1,
            DeliveryStatus::Completed => 2,
        }
    }

    /// Deliveries only move forward (staying put is allowed).
    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        next.rank() >= self.rank()
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::InProgress => write!(f, "in-progress"),
            DeliveryStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Latitude/longitude pair for the dashboard map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Item name + quantity frozen on the delivery slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryLine {
    pub name: String,
    pub quantity: i64,
}

/// Dispatch record derived from a sale whose transaction type is Delivery.
///
/// Exclusively owned by its sale: it exists while the sale exists and is a
/// Delivery sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Delivery {
    pub id: i64,
    pub sale_id: i64,
    pub customer_name: String,
    pub address: String,
    pub phone: String,
    pub items: Vec<DeliveryLine>,
    pub status: DeliveryStatus,
    pub current_location: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

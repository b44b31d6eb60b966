//! # Sale Draft
//!
//! The sales form as submitted, and its fail-fast validation into a
//! [`ValidatedSale`].
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleDraft (optional fields, as typed by the user)                      │
//! │       │                                                                 │
//! │       ▼  validate()                                                     │
//! │  ├── customer missing?            → Required("customer")               │
//! │  ├── no lines / first line blank? → Required("items")                  │
//! │  ├── transaction type missing?    → Required("transactionType")        │
//! │  ├── > 100 lines?                 → OutOfRange("items")                │
//! │  ├── line qty / price bad?        → per-field error                    │
//! │  └── discount > subtotal?         → DiscountExceedsSubtotal            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ValidatedSale (concrete lines + recomputed totals)                     │
//! │       │                                                                 │
//! │       ▼  refill-db SaleWorkflow: stock checks against the database      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks that need storage (item existence, stock, customer archival) run
//! in the workflow, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::totals::SaleTotals;
use crate::types::{CustomerType, PaymentMethod, SaleItemLine, SaleStatus, TransactionType};
use crate::validation::{validate_price_cents, validate_quantity, ValidationResult};
use crate::MAX_SALE_LINES;

// =============================================================================
// Draft Types
// =============================================================================

/// One row of the sales form. `item_id` is None while the row is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DraftLine {
    pub item_id: Option<i64>,
    pub quantity: i64,
    pub price_cents: i64,
}

/// Sales form input for creating or editing a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDraft {
    pub customer_id: Option<i64>,
    /// Snapshot override; taken from the customer record when absent.
    pub customer_type: Option<CustomerType>,
    pub transaction_type: Option<TransactionType>,
    pub delivery_type: Option<String>,
    #[serde(default)]
    pub items: Vec<DraftLine>,
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: SaleStatus,
    pub notes: Option<String>,
    /// Sale date; defaults to now on create, kept on edit.
    #[ts(as = "Option<String>")]
    pub date: Option<DateTime<Utc>>,
    /// Set when editing an existing sale.
    pub editing_sale_id: Option<i64>,
}

/// A draft that passed every storage-independent check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSale {
    pub customer_id: i64,
    pub customer_type: Option<CustomerType>,
    pub transaction_type: TransactionType,
    pub delivery_type: Option<String>,
    pub lines: Vec<SaleItemLine>,
    pub totals: SaleTotals,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub editing_sale_id: Option<i64>,
}

impl ValidatedSale {
    #[inline]
    pub fn is_edit(&self) -> bool {
        self.editing_sale_id.is_some()
    }
}

// =============================================================================
// Validation
// =============================================================================

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SaleDraft {
    /// Validates the draft, failing on the first problem found.
    pub fn validate(&self) -> ValidationResult<ValidatedSale> {
        let customer_id = self
            .customer_id
            .filter(|id| *id > 0)
            .ok_or_else(|| ValidationError::required("customer"))?;

        let first_is_set = self
            .items
            .first()
            .map(|line| line.item_id.is_some())
            .unwrap_or(false);
        if !first_is_set {
            return Err(ValidationError::required("items"));
        }

        let transaction_type = self
            .transaction_type
            .ok_or_else(|| ValidationError::required("transactionType"))?;

        if self.items.len() > MAX_SALE_LINES {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_SALE_LINES as i64,
            });
        }

        let mut lines = Vec::with_capacity(self.items.len());
        for line in &self.items {
            let item_id = line
                .item_id
                .ok_or_else(|| ValidationError::required("itemId"))?;
            validate_quantity(line.quantity)?;
            validate_price_cents(line.price_cents)?;
            lines.push(SaleItemLine {
                item_id,
                quantity: line.quantity,
                price_cents: line.price_cents,
            });
        }

        let totals = SaleTotals::compute(&lines, Money::from_cents(self.discount_cents))?;
        totals.check()?;

        Ok(ValidatedSale {
            customer_id,
            customer_type: self.customer_type,
            transaction_type,
            delivery_type: non_blank(self.delivery_type.as_deref()),
            lines,
            totals,
            payment_method: self.payment_method,
            status: self.status,
            notes: non_blank(self.notes.as_deref()),
            date: self.date,
            editing_sale_id: self.editing_sale_id,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS};

    fn line(item_id: Option<i64>, quantity: i64) -> DraftLine {
        DraftLine {
            item_id,
            quantity,
            price_cents: 2500,
        }
    }

    fn draft() -> SaleDraft {
        SaleDraft {
            customer_id: Some(1),
            transaction_type: Some(TransactionType::WalkIn),
            items: vec![line(Some(1), 3)],
            status: SaleStatus::Completed,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft() {
        let sale = draft().validate().unwrap();
        assert_eq!(sale.customer_id, 1);
        assert_eq!(sale.lines.len(), 1);
        assert_eq!(sale.totals.total.cents(), 7500);
        assert!(!sale.is_edit());
    }

    #[test]
    fn test_missing_fields_in_order() {
        let mut d = draft();
        d.customer_id = None;
        d.transaction_type = None;
        assert_eq!(d.validate(), Err(ValidationError::required("customer")));

        let mut d = draft();
        d.items = vec![line(None, 1)];
        assert_eq!(d.validate(), Err(ValidationError::required("items")));

        let mut d = draft();
        d.items.clear();
        assert_eq!(d.validate(), Err(ValidationError::required("items")));

        let mut d = draft();
        d.transaction_type = None;
        assert_eq!(
            d.validate(),
            Err(ValidationError::required("transactionType"))
        );
    }

    #[test]
    fn test_blank_later_line_rejected() {
        let mut d = draft();
        d.items.push(line(None, 1));
        assert_eq!(d.validate(), Err(ValidationError::required("itemId")));
    }

    #[test]
    fn test_line_limits() {
        let mut d = draft();
        d.items = vec![line(Some(1), 0)];
        assert!(d.validate().is_err());

        let mut d = draft();
        d.items = (0..=MAX_SALE_LINES as i64).map(|i| line(Some(i + 1), 1)).collect();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_discount_exceeds_subtotal() {
        let mut d = draft();
        d.discount_cents = 7501;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::DiscountExceedsSubtotal { .. })
        ));
    }

    #[test]
    fn test_huge_amounts_rejected() {
        let mut d = draft();
        d.items[0].price_cents = i64::MAX / 2;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut d = draft();
        d.items = (1..=MAX_SALE_LINES as i64)
            .map(|id| DraftLine {
                item_id: Some(id),
                quantity: MAX_LINE_QUANTITY,
                price_cents: MAX_PRICE_CENTS,
            })
            .collect();
        let sale = d.validate().unwrap();
        assert_eq!(
            sale.totals.total.cents(),
            MAX_SALE_LINES as i64 * MAX_LINE_QUANTITY * MAX_PRICE_CENTS
        );

        let mut d = draft();
        d.discount_cents = i64::MIN;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_blank_notes_dropped() {
        let mut d = draft();
        d.notes = Some("   ".to_string());
        d.delivery_type = Some(" Scheduled ".to_string());
        let sale = d.validate().unwrap();
        assert_eq!(sale.notes, None);
        assert_eq!(sale.delivery_type.as_deref(), Some("Scheduled"));
    }

    #[test]
    fn test_deserialize_from_form_json() {
        let json = r#"{
            "customerId": 4,
            "transactionType": "Delivery",
            "items": [{ "itemId": 2, "quantity": 5, "priceCents": 3000 }],
            "discountCents": 500,
            "paymentMethod": "GCash",
            "status": "Completed",
            "editingSaleId": 12
        }"#;
        let d: SaleDraft = serde_json::from_str(json).unwrap();
        let sale = d.validate().unwrap();
        assert_eq!(sale.transaction_type, TransactionType::Delivery);
        assert_eq!(sale.totals.total.cents(), 14500);
        assert_eq!(sale.editing_sale_id, Some(12));
    }
}

//! # Sale Totals
//!
//! `subtotal = Σ price × quantity`, `total = subtotal − discount`.
//!
//! Totals are always recomputed from the lines and the discount; they are
//! never accepted from the client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::SaleItemLine;

/// Computed money figures of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl SaleTotals {
    /// Computes totals for the given lines. Pure and idempotent.
    ///
    /// Fails with `OutOfRange` when a figure does not fit in an i64.
    pub fn compute(lines: &[SaleItemLine], discount: Money) -> Result<Self, ValidationError> {
        let mut subtotal = Money::zero();
        for line in lines {
            subtotal = line
                .line_total()
                .and_then(|amount| subtotal.checked_add(amount))
                .ok_or_else(|| out_of_range("subtotal"))?;
        }
        let total = subtotal
            .checked_sub(discount)
            .ok_or_else(|| out_of_range("discount"))?;

        Ok(SaleTotals {
            subtotal,
            discount,
            total,
        })
    }

    /// Rejects negative discounts and discounts larger than the subtotal.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.discount.is_negative() {
            return Err(ValidationError::MustNotBeNegative {
                field: "discount".to_string(),
            });
        }
        if self.total.is_negative() {
            return Err(ValidationError::DiscountExceedsSubtotal {
                discount: self.discount.cents(),
                subtotal: self.subtotal.cents(),
            });
        }
        Ok(())
    }
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item_id: i64, quantity: i64, price_cents: i64) -> SaleItemLine {
        SaleItemLine {
            item_id,
            quantity,
            price_cents,
        }
    }

    #[test]
    fn test_compute() {
        let lines = [line(1, 3, 2500), line(2, 1, 15000)];
        let totals = SaleTotals::compute(&lines, Money::from_cents(1000)).unwrap();

        assert_eq!(totals.subtotal.cents(), 22500);
        assert_eq!(totals.total.cents(), 21500);
        assert!(totals.check().is_ok());
    }

    #[test]
    fn test_recompute_is_stable() {
        let lines = [line(1, 7, 1999), line(3, 2, 350)];
        let first = SaleTotals::compute(&lines, Money::from_cents(99)).unwrap();
        let again = SaleTotals::compute(&lines, first.discount).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_discount_rules() {
        let lines = [line(1, 1, 500)];

        let err = SaleTotals::compute(&lines, Money::from_cents(501))
            .unwrap()
            .check()
            .unwrap_err();
        assert!(matches!(err, ValidationError::DiscountExceedsSubtotal { .. }));

        let err = SaleTotals::compute(&lines, Money::from_cents(-1))
            .unwrap()
            .check()
            .unwrap_err();
        assert!(matches!(err, ValidationError::MustNotBeNegative { .. }));

        assert!(SaleTotals::compute(&lines, Money::from_cents(500))
            .unwrap()
            .check()
            .is_ok());
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        let lines = [line(1, 3, i64::MAX / 2)];
        assert!(matches!(
            SaleTotals::compute(&lines, Money::zero()),
            Err(ValidationError::OutOfRange { .. })
        ));

        let lines = [line(1, 1, i64::MAX), line(2, 1, 1)];
        assert!(SaleTotals::compute(&lines, Money::zero()).is_err());

        let lines = [line(1, 1, 500)];
        assert!(matches!(
            SaleTotals::compute(&lines, Money::from_cents(i64::MIN)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}

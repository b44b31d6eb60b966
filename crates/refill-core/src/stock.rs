//! # Stock Reconciliation
//!
//! Pure helpers used by the sale workflow to keep `Item.current_stock`
//! consistent with the net effect of all Completed sales.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  previous status      new status       net stock effect                 │
//! │  ───────────────      ──────────       ────────────────                 │
//! │  (new sale)           Pending          none                             │
//! │  (new sale)           Completed        − new quantities                 │
//! │  Completed            Completed        + old quantities − new quantities│
//! │  Completed            Pending          + old quantities                 │
//! │  Pending              Completed        − new quantities                 │
//! │  Pending              Pending          none                             │
//! │  Completed            (deleted)        + old quantities                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation runs against the baseline after virtually reverting the old
//! reservation, so an edit that keeps or lowers quantities always passes.
//!
//! Every stock mutation, from any workflow, goes through [`apply_delta`]:
//! additive, clamped at zero.

use std::collections::BTreeMap;

use crate::types::{Item, Sale, SaleItemLine, SaleStatus};

// =============================================================================
// Clamp Discipline
// =============================================================================

/// Applies an additive delta to a stock level, clamping at zero.
///
/// ```rust
/// use refill_core::stock::apply_delta;
///
/// assert_eq!(apply_delta(45, -5), 40);
/// assert_eq!(apply_delta(2, -5), 0);
/// assert_eq!(apply_delta(0, 3), 3);
/// ```
#[inline]
pub fn apply_delta(current: i64, delta: i64) -> i64 {
    current.saturating_add(delta).max(0)
}

// =============================================================================
// Shortfall
// =============================================================================

/// Why a set of lines cannot be taken out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockShortfall {
    /// The line references an item that does not exist.
    Missing { item_id: i64 },
    /// The item exists but holds fewer units than needed.
    Insufficient {
        item_id: i64,
        available: i64,
        needed: i64,
    },
}

impl StockShortfall {
    pub fn item_id(&self) -> i64 {
        match *self {
            StockShortfall::Missing { item_id } => item_id,
            StockShortfall::Insufficient { item_id, .. } => item_id,
        }
    }
}

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Put units back (sale deleted / reverted).
    Restore,
    /// Take units out (sale completed).
    Consume,
}

impl StockDirection {
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            StockDirection::Restore => 1,
            StockDirection::Consume => -1,
        }
    }
}

/// Sums quantities per item, so two lines of the same item are checked
/// together.
pub fn quantities_by_item(lines: &[SaleItemLine]) -> BTreeMap<i64, i64> {
    let mut totals = BTreeMap::new();
    for line in lines {
        *totals.entry(line.item_id).or_insert(0) += line.quantity;
    }
    totals
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// Point-in-time map of item id → stock level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
    levels: BTreeMap<i64, i64>,
}

impl StockSnapshot {
    pub fn new() -> Self {
        StockSnapshot::default()
    }

    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        StockSnapshot {
            levels: items
                .into_iter()
                .map(|item| (item.id, item.current_stock))
                .collect(),
        }
    }

    pub fn insert(&mut self, item_id: i64, stock: i64) {
        self.levels.insert(item_id, stock);
    }

    pub fn get(&self, item_id: i64) -> Option<i64> {
        self.levels.get(&item_id).copied()
    }

    pub fn contains(&self, item_id: i64) -> bool {
        self.levels.contains_key(&item_id)
    }

    /// Returns the first line whose item is absent from the snapshot.
    pub fn find_missing(&self, lines: &[SaleItemLine]) -> Option<StockShortfall> {
        lines
            .iter()
            .find(|line| !self.contains(line.item_id))
            .map(|line| StockShortfall::Missing {
                item_id: line.item_id,
            })
    }
}

/// Read-only check that `lines` can be taken out of `snapshot`.
pub fn can_apply_stock_change(
    lines: &[SaleItemLine],
    snapshot: &StockSnapshot,
) -> Result<(), StockShortfall> {
    for (item_id, needed) in quantities_by_item(lines) {
        let available = snapshot
            .get(item_id)
            .ok_or(StockShortfall::Missing { item_id })?;
        if available < needed {
            return Err(StockShortfall::Insufficient {
                item_id,
                available,
                needed,
            });
        }
    }
    Ok(())
}

/// Moves the snapshot's stock by `sign × quantity` per line, clamping at zero.
/// Lines for items absent from the snapshot are skipped.
pub fn apply_stock_change(
    snapshot: &mut StockSnapshot,
    lines: &[SaleItemLine],
    direction: StockDirection,
) {
    for line in lines {
        if let Some(level) = snapshot.levels.get_mut(&line.item_id) {
            *level = apply_delta(*level, direction.sign() * line.quantity);
        }
    }
}

// =============================================================================
// Stock Plan
// =============================================================================

/// Net per-item stock movement of a single save or delete.
///
/// A Completed → Completed edit selling 3 then 5 of the same item nets to a
/// delta of −2, not −8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPlan {
    /// Lines whose reservation is released.
    released: Vec<SaleItemLine>,
    /// Lines that take stock.
    reserved: Vec<SaleItemLine>,
}

impl StockPlan {
    /// Plan for saving `new_lines` with `new_status`, replacing `previous`
    /// (None when creating).
    pub fn for_save(
        previous: Option<&Sale>,
        new_lines: &[SaleItemLine],
        new_status: SaleStatus,
    ) -> Self {
        StockPlan {
            released: previous
                .map(|sale| sale.reserved_lines().to_vec())
                .unwrap_or_default(),
            reserved: if new_status == SaleStatus::Completed {
                new_lines.to_vec()
            } else {
                Vec::new()
            },
        }
    }

    /// Plan for deleting `sale`.
    pub fn for_delete(sale: &Sale) -> Self {
        StockPlan {
            released: sale.reserved_lines().to_vec(),
            reserved: Vec::new(),
        }
    }

    pub fn released(&self) -> &[SaleItemLine] {
        &self.released
    }

    pub fn reserved(&self) -> &[SaleItemLine] {
        &self.reserved
    }

    /// Every item id the plan references.
    pub fn item_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .released
            .iter()
            .chain(self.reserved.iter())
            .map(|line| line.item_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Net delta per item, zero entries dropped.
    pub fn net_deltas(&self) -> BTreeMap<i64, i64> {
        let mut deltas = BTreeMap::new();
        for (item_id, qty) in quantities_by_item(&self.released) {
            *deltas.entry(item_id).or_insert(0) += qty;
        }
        for (item_id, qty) in quantities_by_item(&self.reserved) {
            *deltas.entry(item_id).or_insert(0) -= qty;
        }
        deltas.retain(|_, delta| *delta != 0);
        deltas
    }

    /// Validates the plan against current stock: virtually restores the
    /// released lines, then checks the reserved lines against that baseline.
    pub fn validate(&self, current: &StockSnapshot) -> Result<(), StockShortfall> {
        let mut baseline = current.clone();
        apply_stock_change(&mut baseline, &self.released, StockDirection::Restore);
        can_apply_stock_change(&self.reserved, &baseline)
    }

    /// Applies the plan to a snapshot (release first, then reserve).
    pub fn apply(&self, snapshot: &mut StockSnapshot) {
        apply_stock_change(snapshot, &self.released, StockDirection::Restore);
        apply_stock_change(snapshot, &self.reserved, StockDirection::Consume);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerType, PaymentMethod, TransactionType};
    use chrono::Utc;

    fn line(item_id: i64, quantity: i64) -> SaleItemLine {
        SaleItemLine {
            item_id,
            quantity,
            price_cents: 2500,
        }
    }

    fn sale(status: SaleStatus, items: Vec<SaleItemLine>) -> Sale {
        let now = Utc::now();
        Sale {
            id: 1,
            invoice_id: "INV-000001".to_string(),
            date: now,
            customer_id: 1,
            customer_type: CustomerType::Regular,
            transaction_type: TransactionType::WalkIn,
            delivery_type: None,
            items,
            subtotal_cents: 0,
            discount_cents: 0,
            total_cents: 0,
            payment_method: PaymentMethod::Cash,
            status,
            notes: None,
            recorded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(levels: &[(i64, i64)]) -> StockSnapshot {
        let mut snap = StockSnapshot::new();
        for &(id, stock) in levels {
            snap.insert(id, stock);
        }
        snap
    }

    #[test]
    fn test_can_apply_reports_missing_and_insufficient() {
        let snap = snapshot(&[(1, 45), (2, 2)]);

        assert_eq!(can_apply_stock_change(&[line(1, 5)], &snap), Ok(()));
        assert_eq!(
            can_apply_stock_change(&[line(2, 5)], &snap),
            Err(StockShortfall::Insufficient {
                item_id: 2,
                available: 2,
                needed: 5
            })
        );
        assert_eq!(
            can_apply_stock_change(&[line(7, 1)], &snap),
            Err(StockShortfall::Missing { item_id: 7 })
        );
    }

    #[test]
    fn test_can_apply_aggregates_duplicate_lines() {
        let snap = snapshot(&[(1, 5)]);
        let err = can_apply_stock_change(&[line(1, 3), line(1, 3)], &snap).unwrap_err();
        assert_eq!(
            err,
            StockShortfall::Insufficient {
                item_id: 1,
                available: 5,
                needed: 6
            }
        );
    }

    #[test]
    fn test_apply_clamps_at_zero() {
        let mut snap = snapshot(&[(1, 2)]);
        apply_stock_change(&mut snap, &[line(1, 5)], StockDirection::Consume);
        assert_eq!(snap.get(1), Some(0));

        apply_stock_change(&mut snap, &[line(1, 4)], StockDirection::Restore);
        assert_eq!(snap.get(1), Some(4));
    }

    #[test]
    fn test_plan_transitions() {
        let old_completed = sale(SaleStatus::Completed, vec![line(1, 3)]);
        let old_pending = sale(SaleStatus::Pending, vec![line(1, 3)]);
        let new_lines = [line(1, 5)];

        // Completed -> Completed: revert 3, apply 5
        let plan = StockPlan::for_save(Some(&old_completed), &new_lines, SaleStatus::Completed);
        assert_eq!(plan.net_deltas(), BTreeMap::from([(1, -2)]));

        // Completed -> Pending: revert only
        let plan = StockPlan::for_save(Some(&old_completed), &new_lines, SaleStatus::Pending);
        assert_eq!(plan.net_deltas(), BTreeMap::from([(1, 3)]));

        // Pending -> Completed: apply only
        let plan = StockPlan::for_save(Some(&old_pending), &new_lines, SaleStatus::Completed);
        assert_eq!(plan.net_deltas(), BTreeMap::from([(1, -5)]));

        // Pending -> Pending: nothing
        let plan = StockPlan::for_save(Some(&old_pending), &new_lines, SaleStatus::Pending);
        assert!(plan.net_deltas().is_empty());

        // New pending sale never touches stock
        assert!(StockPlan::for_save(None, &new_lines, SaleStatus::Pending)
            .net_deltas()
            .is_empty());
    }

    #[test]
    fn test_edit_validates_against_post_revert_baseline() {
        // 3 already reserved, 1 left on the shelf: editing to 4 must pass.
        let old = sale(SaleStatus::Completed, vec![line(1, 3)]);
        let snap = snapshot(&[(1, 1)]);

        let plan = StockPlan::for_save(Some(&old), &[line(1, 4)], SaleStatus::Completed);
        assert_eq!(plan.validate(&snap), Ok(()));

        let plan = StockPlan::for_save(Some(&old), &[line(1, 5)], SaleStatus::Completed);
        assert_eq!(
            plan.validate(&snap),
            Err(StockShortfall::Insufficient {
                item_id: 1,
                available: 4,
                needed: 5
            })
        );
    }

    #[test]
    fn test_conservation_example() {
        // Item A at 45; sell 5, sell 3, delete the first sale -> 42
        let mut snap = snapshot(&[(1, 45)]);
        let first = sale(SaleStatus::Completed, vec![line(1, 5)]);
        let second = sale(SaleStatus::Completed, vec![line(1, 3)]);

        StockPlan::for_save(None, &first.items, SaleStatus::Completed).apply(&mut snap);
        assert_eq!(snap.get(1), Some(40));
        StockPlan::for_save(None, &second.items, SaleStatus::Completed).apply(&mut snap);
        assert_eq!(snap.get(1), Some(37));
        StockPlan::for_delete(&first).apply(&mut snap);
        assert_eq!(snap.get(1), Some(42));
    }

    #[test]
    fn test_item_ids_dedup() {
        let old = sale(SaleStatus::Completed, vec![line(2, 1), line(1, 1)]);
        let plan = StockPlan::for_save(Some(&old), &[line(1, 2), line(3, 1)], SaleStatus::Completed);
        assert_eq!(plan.item_ids(), vec![1, 2, 3]);
    }
}

//! # Stock Adjustments
//!
//! Pure arithmetic for keeping a product's on-hand quantity in step with the
//! sales and damage rows recorded against it.
//!
//! ## Accounting Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product.quantity == opening stock − Σ sale.qty − Σ damage.qty         │
//! │                                                                         │
//! │  record sale qty 5        → change −5                                  │
//! │  edit sale qty 5 → 8      → change −3   (only the delta)               │
//! │  edit sale qty 5 → 2      → change +3                                  │
//! │  delete sale              → no change   (unless restock requested)     │
//! │  record damage qty 2      → change −2                                  │
//! │  move damage A(2) → B(4)  → A +2, B −4                                 │
//! │  delete damage qty 2      → change +2                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer applies each [`StockChange`] in the same transaction
//! as the row write that caused it.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A signed change to one product's on-hand quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub product_id: i64,
    /// Added to `products.quantity` (negative removes stock).
    pub change: i64,
}

impl StockChange {
    /// Stock leaving with a new sale or damage record.
    pub fn remove(product_id: i64, qty: i64) -> Self {
        StockChange {
            product_id,
            change: -qty,
        }
    }

    /// Stock coming back (deleted damage record, restocked sale).
    pub fn restore(product_id: i64, qty: i64) -> Self {
        StockChange {
            product_id,
            change: qty,
        }
    }

    /// The delta for an edited quantity on the same product.
    ///
    /// Returns `None` when the quantity did not change.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::stock::StockChange;
    ///
    /// // 5 → 8 takes three more units out of stock
    /// assert_eq!(StockChange::requantify(1, 5, 8).unwrap().change, -3);
    /// assert!(StockChange::requantify(1, 5, 5).is_none());
    /// ```
    pub fn requantify(product_id: i64, old_qty: i64, new_qty: i64) -> Option<Self> {
        let delta = new_qty - old_qty;
        if delta == 0 {
            None
        } else {
            Some(StockChange {
                product_id,
                change: -delta,
            })
        }
    }

    /// The changes for a record that may have moved to another product.
    ///
    /// Same product: only the quantity delta. Different product: the old
    /// product gets its units back and the new one is decremented.
    pub fn reassign(
        old_product: i64,
        old_qty: i64,
        new_product: i64,
        new_qty: i64,
    ) -> Vec<StockChange> {
        if old_product == new_product {
            return StockChange::requantify(new_product, old_qty, new_qty)
                .into_iter()
                .collect();
        }

        vec![
            StockChange::restore(old_product, old_qty),
            StockChange::remove(new_product, new_qty),
        ]
    }

    #[inline]
    pub fn is_removal(&self) -> bool {
        self.change < 0
    }
}

/// Checks that a change can be applied to the current on-hand quantity and
/// returns the balance after it.
///
/// ## Rules
/// - Additions always pass
/// - Removals pass when `allow_negative` is set (the default)
/// - Otherwise the balance after the change must stay at or above zero
/// - A balance outside `i64` fails with `Overflow` either way
///
/// ## Arguments
/// * `sku` - For the error message
/// * `on_hand` - Current `products.quantity`
/// * `change` - The change about to be applied
/// * `allow_negative` - The `allow_negative_stock` setting
pub fn ensure_available(
    sku: &str,
    on_hand: i64,
    change: &StockChange,
    allow_negative: bool,
) -> CoreResult<i64> {
    let balance = on_hand
        .checked_add(change.change)
        .ok_or_else(|| CoreError::Overflow {
            what: format!("Stock balance for {}", sku),
        })?;

    if allow_negative || !change.is_removal() || balance >= 0 {
        return Ok(balance);
    }

    Err(CoreError::InsufficientStock {
        sku: sku.to_string(),
        available: on_hand,
        requested: -change.change,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requantify_applies_only_the_delta() {
        // 20 on hand, sale of 5 → 15
        let mut on_hand = 20;
        on_hand += StockChange::remove(1, 5).change;
        assert_eq!(on_hand, 15);

        // 5 → 8 → 12, not 17
        on_hand += StockChange::requantify(1, 5, 8).unwrap().change;
        assert_eq!(on_hand, 12);

        // back to 5 then 5 → 2 → 18 from the original 15
        let mut other = 15;
        other += StockChange::requantify(1, 5, 2).unwrap().change;
        assert_eq!(other, 18);
    }

    #[test]
    fn test_reassign_between_products() {
        let same = StockChange::reassign(1, 2, 1, 4);
        assert_eq!(same, vec![StockChange { product_id: 1, change: -2 }]);

        let unchanged = StockChange::reassign(1, 2, 1, 2);
        assert!(unchanged.is_empty());

        let moved = StockChange::reassign(1, 2, 3, 4);
        assert_eq!(
            moved,
            vec![
                StockChange { product_id: 1, change: 2 },
                StockChange { product_id: 3, change: -4 },
            ]
        );
    }

    #[test]
    fn test_ensure_available() {
        let take_five = StockChange::remove(1, 5);

        assert_eq!(ensure_available("TEA-01", 3, &take_five, true).unwrap(), -2);
        assert_eq!(ensure_available("TEA-01", 5, &take_five, false).unwrap(), 0);
        assert_eq!(
            ensure_available("TEA-01", 0, &StockChange::restore(1, 5), false).unwrap(),
            5
        );

        let err = ensure_available("TEA-01", 3, &take_five, false).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 3, requested: 5, .. }
        ));
    }

    #[test]
    fn test_balance_outside_i64_is_an_error() {
        let err = ensure_available("TEA-01", i64::MAX, &StockChange::restore(1, 1), true).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));

        let err = ensure_available("TEA-01", i64::MIN, &StockChange::remove(1, 1), true).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));

        // the last representable balance still applies
        assert_eq!(
            ensure_available("TEA-01", i64::MAX - 3, &StockChange::restore(1, 3), false).unwrap(),
            i64::MAX
        );
    }
}

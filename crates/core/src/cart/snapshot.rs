//! Cart Snapshots

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    cart::{CartError, CartState, LineItem, LineItemId},
    prices::{self, format_price},
};

/// Errors rejecting a stored snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum RestoreError {
    /// Two entries share the same id.
    #[error("snapshot contains line item {0} more than once")]
    DuplicateItem(LineItemId),

    /// An entry would be rejected by the cart.
    #[error(transparent)]
    Invalid(#[from] CartError),
}

/// Read-only view of the cart emitted after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Line items in insertion order
    pub items: Vec<LineItem>,

    /// Cart total when the snapshot was taken
    #[serde(with = "prices::serde_money")]
    pub total_amount: Money<'static, Currency>,
}

impl From<&CartState> for CartSnapshot {
    fn from(state: &CartState) -> Self {
        CartSnapshot {
            items: state.items().to_vec(),
            total_amount: state.total_amount(),
        }
    }
}

impl CartState {
    /// Take a snapshot of the current state.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(self)
    }

    /// Seed a cart from a previously emitted snapshot.
    ///
    /// Items are taken as-is; the stored total is ignored and recomputed.
    ///
    /// # Errors
    ///
    /// Returns a [`RestoreError`] if the snapshot holds duplicate ids or an
    /// item the cart would not accept.
    pub fn restore(
        snapshot: CartSnapshot,
        currency: &'static Currency,
    ) -> Result<Self, RestoreError> {
        let mut seen = FxHashSet::default();

        for item in &snapshot.items {
            if !seen.insert(item.id()) {
                return Err(RestoreError::DuplicateItem(item.id().clone()));
            }

            Self::check_item(item, currency)?;
        }

        let state = Self::with_items(snapshot.items, currency)?;

        if state.total_amount() != snapshot.total_amount {
            warn!(
                stored = %format_price(&snapshot.total_amount),
                recomputed = %format_price(&state.total_amount()),
                "stored cart total differs from recomputed total"
            );
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> TestResult<LineItem> {
        Ok(LineItem::new(
            LineItemId::new(id)?,
            Money::from_minor(price, iso::BRL),
            quantity,
        ))
    }

    #[test]
    fn snapshot_serializes_items_and_total() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1000, 2)?)?;

        let json = serde_json::to_value(cart.snapshot())?;

        assert_eq!(json["totalAmount"], "20.00 BRL");
        assert_eq!(json["items"][0]["id"], "p1");
        assert_eq!(json["items"][0]["quantity"], 2);

        Ok(())
    }

    #[test]
    fn restore_round_trips_a_snapshot() -> TestResult {
        let cart = CartState::new(iso::BRL)
            .add(item("p1", 1000, 2)?)?
            .add(item("p2", 550, 1)?)?;

        let restored = CartState::restore(cart.snapshot(), iso::BRL)?;

        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn restore_recomputes_a_tampered_total() -> TestResult {
        let snapshot: CartSnapshot = serde_json::from_value(json!({
            "items": [{ "id": "p1", "price": "10.00 BRL", "quantity": 3 }],
            "totalAmount": "1.00 BRL",
        }))?;

        let restored = CartState::restore(snapshot, iso::BRL)?;

        assert_eq!(restored.total_amount(), Money::from_minor(3000, iso::BRL));

        Ok(())
    }

    #[test]
    fn restore_rejects_duplicate_ids() -> TestResult {
        let snapshot = CartSnapshot {
            items: vec![item("p1", 100, 1)?, item("p1", 100, 2)?],
            total_amount: Money::from_minor(300, iso::BRL),
        };

        let result = CartState::restore(snapshot, iso::BRL);

        assert!(matches!(result, Err(RestoreError::DuplicateItem(id)) if id.as_str() == "p1"));

        Ok(())
    }

    #[test]
    fn restore_rejects_items_the_cart_would_refuse() -> TestResult {
        let snapshot = CartSnapshot {
            items: vec![item("p1", 100, 0)?],
            total_amount: Money::from_minor(0, iso::BRL),
        };

        let result = CartState::restore(snapshot, iso::BRL);

        assert!(matches!(
            result,
            Err(RestoreError::Invalid(CartError::InvalidQuantity(_)))
        ));

        Ok(())
    }

    #[test]
    fn restore_rejects_other_currencies() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 100, 1)?)?;

        let result = CartState::restore(cart.snapshot(), iso::USD);

        assert!(matches!(
            result,
            Err(RestoreError::Invalid(CartError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }
}

//! Cart
//!
//! [`CartState`] is the cart aggregate. Every transition returns a new state and
//! recomputes the total from the line items, so the total can never drift from
//! `Σ price × quantity`.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::prices::{TotalPriceError, total_price};

mod command;
mod line_item;
mod snapshot;

pub use command::CartCommand;
pub use line_item::{LineItem, LineItemDetails, LineItemError, LineItemId, LineItemIdError};
pub use snapshot::{CartSnapshot, RestoreError};

/// Errors rejecting a cart transition. The state is left unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// An item's currency differs from the cart currency.
    #[error("Item {id} has currency {item}, but cart has currency {cart}")]
    CurrencyMismatch {
        /// Offending line item
        id: LineItemId,
        /// Item currency code
        item: &'static str,
        /// Cart currency code
        cart: &'static str,
    },

    /// Items must be added with at least one unit.
    #[error("Item {0} must be added with a quantity of at least 1")]
    InvalidQuantity(LineItemId),

    /// Unit prices cannot be negative.
    #[error("Item {0} has a negative price")]
    NegativePrice(LineItemId),

    /// Requested quantity does not fit in a line item.
    #[error("Quantity {0} is out of range")]
    QuantityOutOfRange(i64),

    /// Merging a duplicate add overflowed the line quantity.
    #[error("Quantity of {0} overflowed")]
    QuantityOverflow(LineItemId),

    /// Total recomputation failed.
    #[error(transparent)]
    Total(#[from] TotalPriceError),
}

/// Cart state
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
    total_amount: Money<'static, Currency>,
    currency: &'static Currency,
}

impl CartState {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        CartState {
            items: Vec::new(),
            total_amount: Money::from_minor(0, currency),
            currency,
        }
    }

    /// Apply a command, producing the next state.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the command carries invalid input.
    pub fn apply(&self, command: CartCommand) -> Result<Self, CartError> {
        match command {
            CartCommand::Add(item) => self.add(item),
            CartCommand::Remove(id) => self.remove(&id),
            CartCommand::SetQuantity { id, quantity } => self.set_quantity(&id, quantity),
            CartCommand::Clear => Ok(self.clear()),
        }
    }

    /// Add an item, merging its quantity into an existing entry with the same id.
    ///
    /// On merge only the quantity of the existing entry changes; the incoming
    /// descriptive fields and price are discarded. New ids are appended.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the item has no units, a negative price, a
    /// different currency, or if quantities or totals overflow.
    pub fn add(&self, item: LineItem) -> Result<Self, CartError> {
        Self::check_item(&item, self.currency)?;

        let mut items = self.items.clone();

        if let Some(existing) = items.iter_mut().find(|existing| existing.id() == item.id()) {
            let quantity = existing
                .quantity()
                .checked_add(item.quantity())
                .ok_or_else(|| CartError::QuantityOverflow(item.id().clone()))?;

            existing.set_quantity(quantity);
        } else {
            items.push(item);
        }

        Self::with_items(items, self.currency)
    }

    /// Remove the item with the given id. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the total cannot be recomputed.
    pub fn remove(&self, id: &LineItemId) -> Result<Self, CartError> {
        let items = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();

        Self::with_items(items, self.currency)
    }

    /// Overwrite the quantity of an item.
    ///
    /// Quantities below 1 and unknown ids leave the cart unchanged; removal
    /// goes through [`CartState::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOutOfRange`] if the quantity does not fit
    /// in a line item, or a [`CartError`] if the total overflows.
    pub fn set_quantity(&self, id: &LineItemId, quantity: i64) -> Result<Self, CartError> {
        if quantity < 1 || self.get(id).is_none() {
            return Ok(self.clone());
        }

        let quantity =
            u32::try_from(quantity).map_err(|_err| CartError::QuantityOutOfRange(quantity))?;

        let mut items = self.items.clone();

        if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
            item.set_quantity(quantity);
        }

        Self::with_items(items, self.currency)
    }

    /// Empty the cart.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new(self.currency)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Find an item by id.
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// `Σ price × quantity` over all items.
    pub fn total_amount(&self) -> Money<'static, Currency> {
        self.total_amount
    }

    /// Total number of units across all items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Get the number of distinct line items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn with_items(items: Vec<LineItem>, currency: &'static Currency) -> Result<Self, CartError> {
        let total_amount = total_price(&items, currency)?;

        Ok(CartState {
            items,
            total_amount,
            currency,
        })
    }

    fn check_item(item: &LineItem, currency: &'static Currency) -> Result<(), CartError> {
        let item_currency = item.price().currency();

        if item_currency != currency {
            return Err(CartError::CurrencyMismatch {
                id: item.id().clone(),
                item: item_currency.iso_alpha_code,
                cart: currency.iso_alpha_code,
            });
        }

        if item.quantity() == 0 {
            return Err(CartError::InvalidQuantity(item.id().clone()));
        }

        if item.price().to_minor_units() < 0 {
            return Err(CartError::NegativePrice(item.id().clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> TestResult<LineItem> {
        Ok(LineItem::new(
            LineItemId::new(id)?,
            Money::from_minor(price, iso::BRL),
            quantity,
        ))
    }

    fn ids(cart: &CartState) -> Vec<&str> {
        cart.items().iter().map(|item| item.id().as_str()).collect()
    }

    fn assert_total_matches_items(cart: &CartState) {
        let expected: i64 = cart
            .items()
            .iter()
            .map(|item| item.price().to_minor_units() * i64::from(item.quantity()))
            .sum();

        assert_eq!(
            cart.total_amount().to_minor_units(),
            expected,
            "total must equal the sum of line totals"
        );
    }

    #[test]
    fn new_cart_is_empty_with_zero_total() {
        let cart = CartState::new(iso::BRL);

        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Money::from_minor(0, iso::BRL));
        assert_eq!(cart.currency(), iso::BRL);
    }

    #[test]
    fn add_new_item_appends_and_totals() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1000, 2)?)?;

        assert_eq!(ids(&cart), ["p1"]);
        assert_eq!(cart.total_amount(), Money::from_minor(2000, iso::BRL));

        Ok(())
    }

    #[test]
    fn add_existing_item_merges_quantity_only() -> TestResult {
        let original = item("p1", 1000, 2)?.with_details(LineItemDetails {
            title: "Original".to_string(),
            ..LineItemDetails::default()
        });
        let incoming = LineItem::new(
            LineItemId::new("p1")?,
            Money::from_minor(9999, iso::BRL),
            3,
        )
        .with_details(LineItemDetails {
            title: "Incoming".to_string(),
            ..LineItemDetails::default()
        });

        let cart = CartState::new(iso::BRL).add(original)?.add(incoming)?;
        let merged = cart.get(&LineItemId::new("p1")?).ok_or("missing p1")?;

        assert_eq!(cart.len(), 1);
        assert_eq!(merged.quantity(), 5);
        assert_eq!(merged.details().title, "Original");
        assert_eq!(merged.price(), &Money::from_minor(1000, iso::BRL));
        assert_eq!(cart.total_amount(), Money::from_minor(5000, iso::BRL));

        Ok(())
    }

    #[test]
    fn add_preserves_insertion_order() -> TestResult {
        let cart = CartState::new(iso::BRL)
            .add(item("a", 100, 1)?)?
            .add(item("b", 200, 1)?)?
            .add(item("c", 300, 1)?)?
            .add(item("a", 100, 4)?)?;

        assert_eq!(ids(&cart), ["a", "b", "c"]);
        assert_total_matches_items(&cart);

        Ok(())
    }

    #[test]
    fn add_rejects_zero_quantity_and_leaves_state() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1000, 1)?)?;

        let result = cart.add(item("p2", 500, 0)?);

        assert!(matches!(result, Err(CartError::InvalidQuantity(id)) if id.as_str() == "p2"));
        assert_eq!(ids(&cart), ["p1"]);

        Ok(())
    }

    #[test]
    fn add_rejects_negative_price() -> TestResult {
        let result = CartState::new(iso::BRL).add(item("p1", -1, 1)?);

        assert!(matches!(result, Err(CartError::NegativePrice(_))));

        Ok(())
    }

    #[test]
    fn add_rejects_currency_mismatch() -> TestResult {
        let usd = LineItem::new(LineItemId::new("p1")?, Money::from_minor(100, iso::USD), 1);

        match CartState::new(iso::BRL).add(usd) {
            Err(CartError::CurrencyMismatch { id, item, cart }) => {
                assert_eq!(id.as_str(), "p1");
                assert_eq!(item, iso::USD.iso_alpha_code);
                assert_eq!(cart, iso::BRL.iso_alpha_code);
            }
            other => return Err(format!("expected CurrencyMismatch, got {other:?}").into()),
        }

        Ok(())
    }

    #[test]
    fn add_rejects_quantity_overflow_on_merge() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1, u32::MAX)?)?;

        let result = cart.add(item("p1", 1, 1)?);

        assert!(matches!(result, Err(CartError::QuantityOverflow(_))));

        Ok(())
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() -> TestResult {
        let cart = CartState::new(iso::BRL)
            .add(item("p1", 1000, 2)?)?
            .add(item("p2", 500, 1)?)?;

        assert_eq!(cart.remove(&LineItemId::new("missing")?)?, cart);

        Ok(())
    }

    #[test]
    fn remove_keeps_order_of_remaining_items() -> TestResult {
        let cart = CartState::new(iso::BRL)
            .add(item("a", 100, 1)?)?
            .add(item("b", 200, 1)?)?
            .add(item("c", 300, 1)?)?
            .remove(&LineItemId::new("b")?)?;

        assert_eq!(ids(&cart), ["a", "c"]);
        assert_eq!(cart.total_amount(), Money::from_minor(400, iso::BRL));

        Ok(())
    }

    #[test]
    fn set_quantity_below_one_is_ignored() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1000, 5)?)?;
        let id = LineItemId::new("p1")?;

        for quantity in [0, -1, i64::MIN] {
            assert_eq!(cart.set_quantity(&id, quantity)?, cart);
        }

        Ok(())
    }

    #[test]
    fn set_quantity_overwrites() -> TestResult {
        let id = LineItemId::new("p1")?;
        let cart = CartState::new(iso::BRL)
            .add(item("p1", 1000, 5)?)?
            .set_quantity(&id, 1)?;

        assert_eq!(cart.get(&id).map(LineItem::quantity), Some(1));
        assert_eq!(cart.total_amount(), Money::from_minor(1000, iso::BRL));

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_id_is_a_no_op() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1000, 5)?)?;

        assert_eq!(cart.set_quantity(&LineItemId::new("p2")?, 3)?, cart);

        Ok(())
    }

    #[test]
    fn set_quantity_rejects_values_past_u32() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1, 1)?)?;
        let too_many = i64::from(u32::MAX) + 1;

        let result = cart.set_quantity(&LineItemId::new("p1")?, too_many);

        assert_eq!(result, Err(CartError::QuantityOutOfRange(too_many)));
        assert_eq!(cart.set_quantity(&LineItemId::new("ghost")?, too_many)?, cart);

        Ok(())
    }

    #[test]
    fn variants_with_separators_in_options_stay_separate() -> TestResult {
        let price = Money::from_minor(1000, iso::BRL);
        let cart = CartState::new(iso::BRL)
            .add(LineItem::new(
                LineItemId::for_variant("42", Some("S/M"), Some("black"))?,
                price,
                1,
            ))?
            .add(LineItem::new(
                LineItemId::for_variant("42", Some("S"), Some("M/black"))?,
                price,
                1,
            ))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn clear_resets_to_initial_state() -> TestResult {
        let cart = CartState::new(iso::BRL)
            .add(item("p1", 1000, 2)?)?
            .add(item("p2", 500, 1)?)?;

        let cleared = cart.clear();

        assert_eq!(cleared, CartState::new(iso::BRL));
        assert!(cleared.is_empty());
        assert_eq!(cleared.total_amount().to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn apply_routes_commands() -> TestResult {
        let id = LineItemId::new("p1")?;

        let cart = CartState::new(iso::BRL)
            .apply(CartCommand::Add(item("p1", 250, 2)?))?
            .apply(CartCommand::SetQuantity {
                id: id.clone(),
                quantity: 4,
            })?;

        assert_eq!(cart.total_amount(), Money::from_minor(1000, iso::BRL));
        assert_eq!(cart.item_count(), 4);

        let cart = cart.apply(CartCommand::Remove(id))?;

        assert!(cart.is_empty());
        assert_eq!(cart.apply(CartCommand::Clear)?, CartState::new(iso::BRL));

        Ok(())
    }

    #[test]
    fn transitions_are_pure() -> TestResult {
        let cart = CartState::new(iso::BRL).add(item("p1", 1000, 2)?)?;

        let first = cart.add(item("p2", 300, 1)?)?;
        let second = cart.add(item("p2", 300, 1)?)?;

        assert_eq!(first, second);
        assert_eq!(ids(&cart), ["p1"]);

        Ok(())
    }
}

//! Prices

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{BRL, Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::cart::{LineItem, LineItemId};

/// Errors that can occur while converting or parsing prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount could not be represented in minor units, or the string was malformed.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Errors that can occur while calculating a cart total.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line total (unit price times quantity) does not fit in minor units.
    #[error("line total for {0} overflowed")]
    Overflow(LineItemId),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Look up a supported currency by its ISO alpha code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for codes outside the supported set.
pub fn find_currency(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim() {
        "BRL" => Ok(BRL),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Convert a decimal amount into money, rounding half away from zero to minor units.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPrice`] if the amount does not fit in minor units.
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| PriceError::InvalidPrice(amount.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "29.90 BRL") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    money_from_decimal(amount, find_currency(code)?)
}

/// Format money as "AMOUNT CURRENCY", the inverse of [`parse_price`].
pub fn format_price(money: &Money<'_, Currency>) -> String {
    format!(
        "{} {}",
        Decimal::new(money.to_minor_units(), 2),
        money.currency().iso_alpha_code
    )
}

/// Unit price multiplied by quantity, or `None` on overflow.
pub fn line_total(
    price: &Money<'static, Currency>,
    quantity: u32,
) -> Option<Money<'static, Currency>> {
    price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor_units| Money::from_minor(minor_units, price.currency()))
}

/// Calculates the total price of a list of line items.
///
/// An empty list totals to zero in the given currency.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total does not fit in minor units.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn total_price(
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            let line = item
                .line_total()
                .ok_or_else(|| TotalPriceError::Overflow(item.id().clone()))?;

            Ok::<_, TotalPriceError>(acc.add(line)?)
        })
}

/// Serde adapter storing money in the "AMOUNT CURRENCY" string form.
pub mod serde_money {
    use rusty_money::{Money, iso::Currency};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialize money as "AMOUNT CURRENCY".
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        money: &Money<'static, Currency>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_price(money))
    }

    /// Deserialize money from "AMOUNT CURRENCY".
    ///
    /// # Errors
    ///
    /// Fails if the string is not a valid price.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Money<'static, Currency>, D::Error> {
        let raw = String::deserialize(deserializer)?;

        super::parse_price(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        assert_eq!(parse_price("29.90 BRL")?, Money::from_minor(2990, iso::BRL));
        assert_eq!(parse_price("1 USD")?, Money::from_minor(100, iso::USD));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        assert!(matches!(
            parse_price("2.99BRL"),
            Err(PriceError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("2.99 BRL extra"),
            Err(PriceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(PriceError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn format_price_round_trips_through_parse() -> TestResult {
        let money = Money::from_minor(123_456, iso::EUR);

        assert_eq!(format_price(&money), "1234.56 EUR");
        assert_eq!(parse_price(&format_price(&money))?, money);

        Ok(())
    }

    #[test]
    fn money_from_decimal_rounds_half_away_from_zero() -> TestResult {
        let money = money_from_decimal(Decimal::new(10_005, 3), iso::BRL)?;

        assert_eq!(money.to_minor_units(), 1001);

        Ok(())
    }

    #[test]
    fn line_total_detects_overflow() {
        let price = Money::from_minor(i64::MAX, iso::BRL);

        assert!(line_total(&price, 2).is_none());
        assert_eq!(line_total(&price, 1), Some(price));
    }

    #[test]
    fn total_price_of_no_items_is_zero() -> TestResult {
        assert_eq!(total_price(&[], iso::GBP)?, Money::from_minor(0, iso::GBP));

        Ok(())
    }
}

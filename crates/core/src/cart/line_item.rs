//! Line Items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    prices::{self, PriceError},
    products::Product,
};

/// Errors raised while building a line item identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemIdError {
    /// Ids must contain at least one non-whitespace character.
    #[error("line item id cannot be empty")]
    Empty,
}

/// Errors raised while building a line item from a catalog product.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// The product id could not form a line item id.
    #[error(transparent)]
    Id(#[from] LineItemIdError),

    /// The product price could not be converted to money.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Line item identity.
///
/// Either a bare product id, or the product id followed by the selected size
/// and color slots (`42/m/black`, `42//black`). Two variants of the same
/// product are distinct line items.
///
/// `%` and `/` inside each part are percent-encoded, so a separator in a
/// product id, size or color cannot shift the slot boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineItemId(String);

impl LineItemId {
    const SEPARATOR: char = '/';

    /// Use a fully-resolved id as-is.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemIdError::Empty`] if the id is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, LineItemIdError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(LineItemIdError::Empty);
        }

        Ok(Self(id))
    }

    /// Compose the id of a product variant.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemIdError::Empty`] if the product id is blank.
    pub fn for_variant(
        product_id: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<Self, LineItemIdError> {
        let mut id = Self::new(Self::escape(product_id))?;

        if size.is_some() || color.is_some() {
            for part in [size, color] {
                id.0.push(Self::SEPARATOR);
                id.0.push_str(&Self::escape(part.unwrap_or_default()));
            }
        }

        Ok(id)
    }

    fn escape(part: &str) -> String {
        part.replace('%', "%25").replace(Self::SEPARATOR, "%2F")
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineItemId {
    type Error = LineItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LineItemId> for String {
    fn from(id: LineItemId) -> Self {
        id.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive fields carried through for display.
///
/// None of these are revised after the item enters the cart, and stock is
/// not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemDetails {
    /// Catalog product the item was created from
    pub product_id: String,

    /// Product title
    pub title: String,

    /// Product category slug
    pub category: String,

    /// Image URL
    pub image: String,

    /// Product description
    pub description: String,

    /// Selected size, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Selected color, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Units in stock when the item was added
    pub stock: u32,

    /// Catalog popularity score
    pub popularity: u32,

    /// Featured flag
    pub featured: bool,
}

/// One product variant in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: LineItemId,

    #[serde(flatten)]
    details: LineItemDetails,

    #[serde(with = "prices::serde_money")]
    price: Money<'static, Currency>,

    quantity: u32,
}

impl LineItem {
    /// Creates a new line item with empty descriptive details.
    pub fn new(id: LineItemId, price: Money<'static, Currency>, quantity: u32) -> Self {
        Self {
            id,
            details: LineItemDetails::default(),
            price,
            quantity,
        }
    }

    /// Build a line item for a catalog product variant.
    ///
    /// The unit price is fixed here; later catalog changes do not reach the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the product id is blank or its price
    /// cannot be represented in `currency`.
    pub fn from_product(
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
        currency: &'static Currency,
    ) -> Result<Self, LineItemError> {
        let id = LineItemId::for_variant(&product.id, size, color)?;
        let price = prices::money_from_decimal(product.price, currency)?;

        Ok(Self::new(id, price, quantity).with_details(LineItemDetails {
            product_id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            image: product.main_image().to_string(),
            description: product.description.clone(),
            size: size.map(str::to_string),
            color: color.map(str::to_string),
            stock: product.stock,
            popularity: product.popularity,
            featured: product.featured,
        }))
    }

    /// Replace the descriptive details.
    #[must_use]
    pub fn with_details(mut self, details: LineItemDetails) -> Self {
        self.details = details;
        self
    }

    /// Line item id
    pub fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Descriptive details
    pub fn details(&self) -> &LineItemDetails {
        &self.details
    }

    /// Unit price
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, or `None` if it overflows.
    pub fn line_total(&self) -> Option<Money<'static, Currency>> {
        prices::line_total(&self.price, self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::products::ProductImage;

    use super::*;

    fn product() -> Product {
        Product {
            id: "42".to_string(),
            title: "Linen Shirt".to_string(),
            description: "Breathable".to_string(),
            category: "shirts".to_string(),
            price: Decimal::new(8990, 2),
            image: None,
            images: vec![ProductImage {
                id: "1".to_string(),
                url: "/img/shirt.jpg".to_string(),
                is_primary: false,
            }],
            sizes: Vec::new(),
            colors: Vec::new(),
            popularity: 7,
            stock: 3,
            featured: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(LineItemId::new("  "), Err(LineItemIdError::Empty));
        assert_eq!(
            LineItemId::for_variant("", Some("m"), None),
            Err(LineItemIdError::Empty)
        );
    }

    #[test]
    fn variant_ids_keep_both_slots() -> TestResult {
        assert_eq!(LineItemId::for_variant("42", None, None)?.as_str(), "42");
        assert_eq!(
            LineItemId::for_variant("42", Some("m"), Some("black"))?.as_str(),
            "42/m/black"
        );
        assert_ne!(
            LineItemId::for_variant("42", Some("black"), None)?,
            LineItemId::for_variant("42", None, Some("black"))?
        );

        Ok(())
    }

    #[test]
    fn separators_inside_parts_do_not_collide() -> TestResult {
        let slash_in_size = LineItemId::for_variant("42", Some("S/M"), Some("black"))?;
        let slash_in_color = LineItemId::for_variant("42", Some("S"), Some("M/black"))?;

        assert_eq!(slash_in_size.as_str(), "42/S%2FM/black");
        assert_eq!(slash_in_color.as_str(), "42/S/M%2Fblack");
        assert_ne!(slash_in_size, slash_in_color);

        assert_ne!(
            LineItemId::for_variant("42/x/", None, None)?,
            LineItemId::for_variant("42", Some("x"), None)?
        );
        assert_ne!(
            LineItemId::for_variant("42", Some("a%2Fb"), None)?,
            LineItemId::for_variant("42", Some("a/b"), None)?
        );

        Ok(())
    }

    #[test]
    fn from_product_copies_catalog_fields() -> TestResult {
        let item = LineItem::from_product(&product(), Some("m"), Some("black"), 2, iso::BRL)?;

        assert_eq!(item.id().as_str(), "42/m/black");
        assert_eq!(item.price(), &Money::from_minor(8990, iso::BRL));
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.details().product_id, "42");
        assert_eq!(item.details().image, "/img/shirt.jpg");
        assert_eq!(item.details().size.as_deref(), Some("m"));
        assert_eq!(item.details().stock, 3);
        assert!(item.details().featured);

        Ok(())
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() -> TestResult {
        let item = LineItem::new(LineItemId::new("p1")?, Money::from_minor(1000, iso::BRL), 3);

        assert_eq!(item.line_total(), Some(Money::from_minor(3000, iso::BRL)));

        Ok(())
    }

    #[test]
    fn serializes_price_as_amount_and_currency() -> TestResult {
        let item = LineItem::new(LineItemId::new("p1")?, Money::from_minor(1050, iso::BRL), 1);

        let json = serde_json::to_value(&item)?;

        assert_eq!(json["id"], "p1");
        assert_eq!(json["price"], "10.50 BRL");
        assert_eq!(json["quantity"], 1);
        assert_eq!(serde_json::from_value::<LineItem>(json)?, item);

        Ok(())
    }

    #[test]
    fn deserializing_a_blank_id_fails() {
        let json = serde_json::json!({ "id": "", "price": "1.00 BRL", "quantity": 1 });

        assert!(serde_json::from_value::<LineItem>(json).is_err());
    }
}

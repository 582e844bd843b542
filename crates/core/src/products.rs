//! Products

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::datastore::record_id;

/// Image shown when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    #[serde(deserialize_with = "record_id::deserialize")]
    pub id: String,

    /// Product title
    pub title: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Category slug
    #[serde(default)]
    pub category: String,

    /// Unit price in major units
    pub price: Decimal,

    /// Legacy single image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Product gallery
    #[serde(default)]
    pub images: Vec<ProductImage>,

    /// Size options
    #[serde(default)]
    pub sizes: Vec<ProductSize>,

    /// Color options
    #[serde(default)]
    pub colors: Vec<ProductColor>,

    /// Popularity score
    #[serde(default)]
    pub popularity: u32,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Featured on the landing page
    #[serde(default)]
    pub featured: bool,

    /// Set by the datastore on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Set by the datastore on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Product {
    /// URL of the image to show for this product.
    ///
    /// Prefers the primary gallery image, then the first gallery image, then
    /// the legacy `image` field, then [`PLACEHOLDER_IMAGE`].
    pub fn main_image(&self) -> &str {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
            .map(|image| image.url.as_str())
            .or_else(|| self.image.as_deref().filter(|url| !url.is_empty()))
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Names of the sizes currently available.
    pub fn available_sizes(&self) -> impl Iterator<Item = &str> {
        self.sizes
            .iter()
            .filter(|size| size.available)
            .map(|size| size.name.as_str())
    }

    /// Names of the colors currently available.
    pub fn available_colors(&self) -> impl Iterator<Item = &str> {
        self.colors
            .iter()
            .filter(|color| color.available)
            .map(|color| color.name.as_str())
    }
}

/// Product gallery image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Image id
    #[serde(deserialize_with = "record_id::deserialize")]
    pub id: String,

    /// Image URL
    pub url: String,

    /// Whether this is the main image
    #[serde(default)]
    pub is_primary: bool,
}

/// Size option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSize {
    /// Size label, e.g. "m"
    pub name: String,

    /// Whether the size can be ordered
    #[serde(default)]
    pub available: bool,
}

/// Color option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductColor {
    /// Color label
    pub name: String,

    /// Hex swatch
    #[serde(default)]
    pub hex: String,

    /// Whether the color can be ordered
    #[serde(default)]
    pub available: bool,
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category id
    #[serde(deserialize_with = "record_id::deserialize")]
    pub id: String,

    /// Display name
    pub name: String,

    /// URL slug, matched against [`Product::category`]
    pub slug: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Sort key
    #[serde(default)]
    pub display_order: i64,

    /// Hidden categories are not listed
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Set by the datastore on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Set by the datastore on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

fn default_active() -> bool {
    true
}

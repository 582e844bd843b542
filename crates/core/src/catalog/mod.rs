//! Catalog
//!
//! Read-only access to products and categories. The cart trusts product
//! records verbatim when an item is added and never re-reads them.

use mockall::automock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::{
    datastore::{Datastore, DatastoreError, Query},
    products::{Category, Product},
};

/// Collection holding products.
pub const PRODUCTS: &str = "products";

/// Collection holding categories.
pub const CATEGORIES: &str = "categories";

/// Products shown per page of the shop.
pub const PRODUCTS_PER_PAGE: usize = 9;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying datastore failure
    #[error(transparent)]
    Datastore(#[from] DatastoreError),

    /// A record did not match the product or category shape.
    #[error("failed to decode catalog record: {0}")]
    Decode(#[from] serde_json::Error),

    /// Pages must hold at least one product.
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Product listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only list products in this category slug
    pub category: Option<String>,

    /// 1-based page number
    pub page: usize,

    /// Products per page
    pub per_page: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            category: None,
            page: 1,
            per_page: PRODUCTS_PER_PAGE,
        }
    }
}

impl ProductQuery {
    /// First page of every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category slug.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Select a page; page 0 is treated as page 1.
    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Change the page size.
    #[must_use]
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }
}

/// One page of products
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// Products on this page
    pub products: Vec<Product>,

    /// 1-based page number
    pub page: usize,

    /// Page size used
    pub per_page: usize,

    /// Matching products across all pages
    pub total_count: usize,

    /// Number of pages, at least 1
    pub total_pages: usize,
}

/// Source of product records.
#[automock]
pub trait Catalog {
    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be read.
    fn product(&self, id: &str) -> Result<Option<Product>, CatalogError>;

    /// List a page of products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be read or the page size is zero.
    fn products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError>;

    /// Active categories ordered by their display order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be read.
    fn categories(&self) -> Result<Vec<Category>, CatalogError>;
}

/// Catalog backed by the `products` and `categories` datastore collections.
#[derive(Debug, Clone, Copy)]
pub struct DatastoreCatalog<'a> {
    datastore: &'a Datastore,
}

impl<'a> DatastoreCatalog<'a> {
    /// Read from the given datastore.
    pub fn new(datastore: &'a Datastore) -> Self {
        DatastoreCatalog { datastore }
    }
}

impl Catalog for DatastoreCatalog<'_> {
    fn product(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        self.datastore
            .get(PRODUCTS, id)?
            .map(decode)
            .transpose()
    }

    fn products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        if query.per_page == 0 {
            return Err(CatalogError::InvalidPageSize);
        }

        let page = query.page.max(1);
        let mut filter = Query::new().page(page, query.per_page);

        if let Some(category) = &query.category {
            filter = filter.filter("category", category.as_str());
        }

        let listed = self.datastore.list(PRODUCTS, &filter)?;
        let products = listed
            .records
            .iter()
            .map(decode)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(ProductPage {
            products,
            page,
            per_page: query.per_page,
            total_count: listed.total_count,
            total_pages: listed.total_count.div_ceil(query.per_page).max(1),
        })
    }

    fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let listed = self.datastore.list(CATEGORIES, &Query::new())?;

        let mut categories = listed
            .records
            .iter()
            .map(decode::<Category>)
            .filter(|category| !matches!(category, Ok(category) if !category.is_active))
            .collect::<Result<Vec<_>, _>>()?;

        categories.sort_by_key(|category| category.display_order);

        Ok(categories)
    }
}

fn decode<T: DeserializeOwned>(record: &Value) -> Result<T, CatalogError> {
    Ok(T::deserialize(record)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn datastore(dir: &tempfile::TempDir) -> TestResult<Datastore> {
        let path = dir.path().join("db.json");
        let products: Vec<Value> = (1..=20)
            .map(|n| {
                let category = if n % 2 == 0 { "shirts" } else { "coats" };

                json!({
                    "id": n.to_string(),
                    "title": format!("Product {n}"),
                    "category": category,
                    "price": n * 10,
                })
            })
            .collect();

        fs::write(
            &path,
            serde_json::to_vec(&json!({
                "products": products,
                "categories": [
                    { "id": "1", "name": "Coats", "slug": "coats", "displayOrder": 2, "isActive": true },
                    { "id": "2", "name": "Hidden", "slug": "hidden", "displayOrder": 0, "isActive": false },
                    { "id": "3", "name": "Shirts", "slug": "shirts", "displayOrder": 1, "isActive": true }
                ]
            }))?,
        )?;

        Ok(Datastore::open(path)?)
    }

    #[test]
    fn product_lookup_decodes_records() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = datastore(&dir)?;
        let catalog = DatastoreCatalog::new(&store);

        let product = catalog.product("4")?.ok_or("missing product 4")?;

        assert_eq!(product.title, "Product 4");
        assert_eq!(product.category, "shirts");
        assert!(catalog.product("404")?.is_none());

        Ok(())
    }

    #[test]
    fn products_are_paged_nine_at_a_time() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = datastore(&dir)?;
        let catalog = DatastoreCatalog::new(&store);

        let last = catalog.products(&ProductQuery::new().page(3))?;

        assert_eq!(last.total_count, 20);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.products.len(), 2);

        Ok(())
    }

    #[test]
    fn products_filter_by_category() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = datastore(&dir)?;
        let catalog = DatastoreCatalog::new(&store);

        let page = catalog.products(&ProductQuery::new().category("shirts"))?;

        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages, 2);
        assert!(page.products.iter().all(|p| p.category == "shirts"));

        Ok(())
    }

    #[test]
    fn empty_catalog_has_one_page() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = datastore(&dir)?;
        let catalog = DatastoreCatalog::new(&store);

        let page = catalog.products(&ProductQuery::new().category("shoes"))?;

        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);

        Ok(())
    }

    #[test]
    fn zero_page_size_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = datastore(&dir)?;

        assert!(matches!(
            DatastoreCatalog::new(&store).products(&ProductQuery::new().per_page(0)),
            Err(CatalogError::InvalidPageSize)
        ));

        Ok(())
    }

    #[test]
    fn categories_are_active_and_ordered() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = datastore(&dir)?;

        let slugs: Vec<String> = DatastoreCatalog::new(&store)
            .categories()?
            .into_iter()
            .map(|category| category.slug)
            .collect();

        assert_eq!(slugs, ["shirts", "coats"]);

        Ok(())
    }
}

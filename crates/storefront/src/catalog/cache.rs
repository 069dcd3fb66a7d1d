//! Cache types for catalog responses.

use alfath_core::{Category, Product, ProductId, SubcategoryId};

/// One cache slot per read endpoint and argument.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Category(String),
    Subcategory(SubcategoryId),
    Featured,
    BestSellers,
    OnSale,
    Search(String),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Option<Box<Product>>),
    Categories(Vec<Category>),
}

impl CacheValue {
    pub(crate) fn into_products(self) -> Option<Vec<Product>> {
        match self {
            Self::Products(products) => Some(products),
            _ => None,
        }
    }

    pub(crate) fn into_product(self) -> Option<Option<Product>> {
        match self {
            Self::Product(product) => Some(product.map(|p| *p)),
            _ => None,
        }
    }

    pub(crate) fn into_categories(self) -> Option<Vec<Category>> {
        match self {
            Self::Categories(categories) => Some(categories),
            _ => None,
        }
    }
}

//! Catalog entities as the backend serves them.
//!
//! Field names follow the backend's camelCase JSON. Fields the backend may
//! omit carry serde defaults so a sparse product still deserializes.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId, SubcategoryId};

/// A product in the catalog.
///
/// Immutable from the cart's perspective: the cart stores a copy taken when
/// the line was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Current (discounted) unit price.
    pub price: Decimal,
    /// Pre-discount unit price, present only for discounted products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u8>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<BTreeMap<String, String>>,
}

impl Product {
    /// Unit price before any discount.
    #[must_use]
    pub fn list_price(&self) -> Decimal {
        self.original_price.unwrap_or(self.price)
    }

    /// Amount saved per unit, zero when the product has no original price.
    #[must_use]
    pub fn unit_savings(&self) -> Decimal {
        self.original_price
            .map_or(Decimal::ZERO, |original| original - self.price)
    }

    /// The image to show first: the primary image, else the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        if self.image.is_empty() {
            self.images.first().map(String::as_str)
        } else {
            Some(self.image.as_str())
        }
    }

    /// Specification entries as ordered key/value pairs.
    pub fn specifications(&self) -> impl Iterator<Item = (&str, &str)> {
        self.specifications
            .iter()
            .flatten()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub ancestors: Vec<CategoryId>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryRef>,
}

const fn default_true() -> bool {
    true
}

impl Category {
    /// Whether the category has any subcategories to browse into.
    #[must_use]
    pub fn has_subcategories(&self) -> bool {
        !self.subcategories.is_empty()
    }
}

/// Reference from a category to one of its subcategories.
///
/// The backend sends either the bare id or a populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubcategoryRef {
    Id(SubcategoryId),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: SubcategoryId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl SubcategoryRef {
    /// The referenced subcategory id, whichever form it arrived in.
    #[must_use]
    pub const fn id(&self) -> &SubcategoryId {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }

    /// Display name when the backend populated it.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { name, .. } => name.as_deref(),
        }
    }
}

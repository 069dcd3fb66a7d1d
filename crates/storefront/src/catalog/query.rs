//! Client-side filtering and sorting of product and category lists.
//!
//! Filters always run in the same order: category, subcategory, text search,
//! then sort. The sort is stable, so products that compare equal keep their
//! catalog order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use alfath_core::{Category, Product};

/// Sort orders offered on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first.
    Rating,
    /// Alphabetical by name.
    Name,
    /// Highest id first; ids grow as products are added.
    Newest,
}

impl SortKey {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Name => compare_names(&a.name, &b.name),
            Self::Newest => b.id.cmp(&a.id),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Newest => "newest",
        })
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            "newest" => Ok(Self::Newest),
            _ => Err(format!(
                "invalid sort key: {s} (expected price-low, price-high, rating, name or newest)"
            )),
        }
    }
}

/// Case-folded comparison with a raw tie-break so the order is total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Whether `product` matches an already lowercased search term.
fn matches_search(product: &Product, needle: &str) -> bool {
    [&product.name, &product.description, &product.brand]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Free-text product search over name, description and brand.
#[must_use]
pub fn search_products(products: &[Product], term: &str) -> Vec<Product> {
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| matches_search(p, &needle))
        .cloned()
        .collect()
}

/// A listing-page query.
///
/// Empty or whitespace-only strings behave as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category name the product's category label must equal.
    pub category: Option<String>,
    /// Subcategory name the product's subcategory label must equal.
    pub subcategory: Option<String>,
    /// Case-insensitive search term.
    pub search: Option<String>,
    pub sort: Option<SortKey>,
}

impl ProductQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to products in `category`.
    #[must_use]
    pub fn in_category(mut self, category: &Category) -> Self {
        self.category = Some(category.name.clone());
        self
    }

    #[must_use]
    pub fn category_name(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    #[must_use]
    pub fn subcategory_name(mut self, name: impl Into<String>) -> Self {
        self.subcategory = Some(name.into());
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub const fn sort(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    /// Apply the query to `products`, returning the filtered, sorted view.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let category = non_empty(self.category.as_deref());
        let subcategory = non_empty(self.subcategory.as_deref());
        let needle = non_empty(self.search.as_deref()).map(str::to_lowercase);

        let mut view: Vec<Product> = products
            .iter()
            .filter(|p| category.is_none_or(|name| p.category == name))
            .filter(|p| subcategory.is_none_or(|name| p.sub_category.as_deref() == Some(name)))
            .filter(|p| needle.as_deref().is_none_or(|n| matches_search(p, n)))
            .cloned()
            .collect();

        if let Some(key) = self.sort {
            view.sort_by(|a, b| key.compare(a, b));
        }
        view
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Categories worth showing in the browse sidebar.
///
/// Keeps categories with at least one subcategory whose name or description
/// contains `search` (case-insensitive). An empty term matches everything.
#[must_use]
pub fn filter_categories(categories: &[Category], search: &str) -> Vec<Category> {
    let needle = search.trim().to_lowercase();
    categories
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle)
        })
        .filter(|c| c.has_subcategories())
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, category: &str, price: i64, rating: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "category": category,
            "price": price,
            "rating": rating,
            "brand": "Brand",
            "description": "",
        }))
        .unwrap()
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_category_filter_exact_match() {
        let products = vec![
            product(1, "X", "منظفات", 10, 4.0),
            product(2, "Y", "أدوات", 20, 4.0),
        ];
        let view = ProductQuery::new().category_name("منظفات").apply(&products);
        assert_eq!(names(&view), ["X"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_three_fields() {
        let mut products = vec![
            product(1, "Floor Cleaner", "c", 10, 4.0),
            product(2, "Sponge", "c", 5, 4.0),
            product(3, "Bucket", "c", 7, 4.0),
        ];
        products[1].description = "great with FLOOR tiles".to_string();
        products[2].brand = "FloorCo".to_string();

        let view = ProductQuery::new().search("floor").apply(&products);
        assert_eq!(names(&view), ["Floor Cleaner", "Sponge", "Bucket"]);

        let view = ProductQuery::new().search("sponge").apply(&products);
        assert_eq!(names(&view), ["Sponge"]);
    }

    #[test]
    fn test_sort_keys() {
        let products = vec![
            product(1, "b", "c", 30, 3.0),
            product(3, "A", "c", 10, 5.0),
            product(2, "c", "c", 20, 4.0),
        ];

        let by = |key| names(&ProductQuery::new().sort(key).apply(&products)).join(",");
        assert_eq!(by(SortKey::PriceLow), "A,c,b");
        assert_eq!(by(SortKey::PriceHigh), "b,c,A");
        assert_eq!(by(SortKey::Rating), "A,c,b");
        assert_eq!(by(SortKey::Name), "A,b,c");
        assert_eq!(by(SortKey::Newest), "A,c,b");
    }

    #[test]
    fn test_sort_is_stable() {
        let products = vec![
            product(1, "first", "c", 10, 4.0),
            product(2, "second", "c", 10, 4.0),
        ];
        let view = ProductQuery::new().sort(SortKey::PriceLow).apply(&products);
        assert_eq!(names(&view), ["first", "second"]);
    }

    #[test]
    fn test_filters_compose_before_sort() {
        let mut products = vec![
            product(1, "Lavender Floor", "منظفات", 45, 4.5),
            product(2, "Lemon Floor", "منظفات", 30, 4.0),
            product(3, "Floor Mop", "أدوات", 60, 4.8),
            product(4, "Dish Soap", "منظفات", 35, 4.2),
        ];
        for p in &mut products {
            p.sub_category = Some("أرضيات".to_string());
        }
        products[1].sub_category = Some("أخرى".to_string());

        let view = ProductQuery::new()
            .category_name("منظفات")
            .subcategory_name("أرضيات")
            .search("floor")
            .sort(SortKey::PriceLow)
            .apply(&products);
        assert_eq!(names(&view), ["Lavender Floor"]);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let products = vec![product(1, "X", "a", 1, 1.0), product(2, "Y", "b", 1, 1.0)];
        let view = ProductQuery::new()
            .category_name("  ")
            .search("")
            .apply(&products);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("price-high".parse::<SortKey>().unwrap(), SortKey::PriceHigh);
        assert_eq!(SortKey::Newest.to_string(), "newest");
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_filter_categories() {
        let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
            {"_id": "1", "name": "منظفات", "description": "منظفات منزلية", "subcategories": ["1"]},
            {"_id": "2", "name": "أدوات", "description": "أدوات الطبخ", "subcategories": ["5"]},
            {"_id": "3", "name": "فارغة", "description": "منظفات", "subcategories": []}
        ]))
        .unwrap();

        let all = filter_categories(&categories, "");
        assert_eq!(all.len(), 2);

        let matched = filter_categories(&categories, "الطبخ");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "أدوات");

        let matched = filter_categories(&categories, "منظفات");
        assert_eq!(matched.len(), 1);
    }
}

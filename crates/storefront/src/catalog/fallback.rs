//! Static seed catalog served when the backend is unreachable.

use std::collections::BTreeMap;

use alfath_core::{Category, CategoryId, Product, ProductId, SubcategoryId, SubcategoryRef};
use rust_decimal::Decimal;

use super::query::search_products;

/// Minimum rating for a product to be featured.
const FEATURED_MIN_RATING: f64 = 4.5;

/// Minimum review count for a product to count as a best seller.
const BEST_SELLER_MIN_REVIEWS: u32 = 100;

/// How many products a home-page strip shows.
const HIGHLIGHT_LIMIT: usize = 4;

/// Label for subcategories missing from the name table.
const UNKNOWN_SUBCATEGORY: &str = "فئة فرعية";

const SUBCATEGORY_TABLE: &[(&str, &str, u32)] = &[
    ("1", "منظفات الأرضيات", 8),
    ("2", "منظفات المطبخ", 12),
    ("3", "منظفات الحمام", 6),
    ("4", "منظفات الزجاج", 4),
    ("5", "منظفات الملابس", 10),
    ("6", "أدوات المطبخ", 15),
    ("7", "أدوات التنظيف", 9),
    ("8", "أدوات الحمام", 7),
    ("9", "أدوات الغسيل", 5),
    ("10", "منتجات العناية بالبشرة", 8),
    ("11", "منتجات العناية بالشعر", 6),
    ("12", "منتجات العناية الشخصية", 10),
];

/// Display name for a subcategory id, with a generic label when unknown.
#[must_use]
pub fn subcategory_name(id: &SubcategoryId) -> &'static str {
    SUBCATEGORY_TABLE
        .iter()
        .find(|(key, _, _)| *key == id.as_str())
        .map_or(UNKNOWN_SUBCATEGORY, |(_, name, _)| *name)
}

/// Known product count for a subcategory id, 0 when unknown.
#[must_use]
pub fn subcategory_product_count(id: &SubcategoryId) -> u32 {
    SUBCATEGORY_TABLE
        .iter()
        .find(|(key, _, _)| *key == id.as_str())
        .map_or(0, |(_, _, count)| *count)
}

/// The seed catalog.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::seed()
    }
}

impl FallbackCatalog {
    /// Build a fallback catalog from explicit lists.
    #[must_use]
    pub const fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// The built-in demo catalog.
    #[must_use]
    pub fn seed() -> Self {
        Self::new(seed_products(), seed_categories())
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products.clone()
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    #[must_use]
    pub fn by_category(&self, name: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == name)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn featured(&self) -> Vec<Product> {
        self.highlight(|p| p.rating >= FEATURED_MIN_RATING)
    }

    #[must_use]
    pub fn best_sellers(&self) -> Vec<Product> {
        self.highlight(|p| p.reviews >= BEST_SELLER_MIN_REVIEWS)
    }

    #[must_use]
    pub fn on_sale(&self) -> Vec<Product> {
        self.highlight(|p| p.is_on_sale)
    }

    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Product> {
        search_products(&self.products, term)
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn highlight(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products
            .iter()
            .filter(|&p| keep(p))
            .take(HIGHLIGHT_LIMIT)
            .cloned()
            .collect()
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "منظف أرضيات لافندر".to_string(),
            description: "منظف أرضيات عالي الجودة برائحة اللافندر المنعشة، مناسب لجميع أنواع الأرضيات"
                .to_string(),
            price: Decimal::from(45),
            original_price: Some(Decimal::from(60)),
            image: "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=400".to_string(),
            category: "منظفات".to_string(),
            sub_category: Some("منظفات أرضيات".to_string()),
            brand: "فريش".to_string(),
            in_stock: true,
            rating: 4.5,
            reviews: 128,
            is_on_sale: true,
            discount_percentage: Some(25),
            images: vec![
                "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=400".to_string(),
                "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=400".to_string(),
            ],
            specifications: Some(specs(&[
                ("الحجم", "1 لتر"),
                ("الرائحة", "لافندر"),
                ("النوع", "سائل"),
            ])),
        },
        Product {
            id: ProductId::new(2),
            name: "سائل غسيل الأطباق".to_string(),
            description: "سائل غسيل أطباق فعال يزيل الدهون بسهولة ويحمي يديك".to_string(),
            price: Decimal::from(35),
            original_price: None,
            image: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400".to_string(),
            category: "منظفات".to_string(),
            sub_category: Some("منظفات أطباق".to_string()),
            brand: "فيري".to_string(),
            in_stock: true,
            rating: 4.2,
            reviews: 95,
            is_on_sale: false,
            discount_percentage: None,
            images: vec![
                "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400".to_string(),
            ],
            specifications: Some(specs(&[("الحجم", "750 مل"), ("النوع", "سائل")])),
        },
    ]
}

fn seed_categories() -> Vec<Category> {
    let category = |id: &str, name: &str, image: &str, description: &str, subs: &[&str]| Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        image: image.to_string(),
        description: description.to_string(),
        is_active: true,
        parent: None,
        ancestors: Vec::new(),
        subcategories: subs
            .iter()
            .map(|s| SubcategoryRef::Id(SubcategoryId::new(*s)))
            .collect(),
    };

    vec![
        category(
            "1",
            "منظفات",
            "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=400",
            "جميع أنواع المنظفات المنزلية",
            &["1", "2", "3", "4"],
        ),
        category(
            "2",
            "أدوات منزلية",
            "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400",
            "الأدوات الكهربائية والمنزلية",
            &["5", "6", "7", "8", "9"],
        ),
        category(
            "3",
            "أدوات مطبخ",
            "https://images.unsplash.com/photo-1556909114-fcd25c85cd64?w=400",
            "أدوات الطبخ والطهي الاحترافية",
            &["10", "11", "12", "13"],
        ),
    ]
}

fn specs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

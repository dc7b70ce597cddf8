//! In-memory product catalog
//!
//! The catalog is generated once at startup from the static category templates
//! below and never mutated afterwards. Handlers share it read-only through
//! `web::Data`, so no locking is needed.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::models::{Category, Product};

/// Number of products generated when no size is configured
pub const DEFAULT_CATALOG_SIZE: usize = 100;

/// Blueprint for one kind of product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTemplate {
    pub category: Category,
    pub product_type: &'static str,
    pub min_price: u32,
    pub max_price: u32,
    /// Image path; `{}` is replaced with the product id
    pub image: &'static str,
}

/// Brand name in the storefront's local language and its display variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandName {
    pub local: &'static str,
    pub display: &'static str,
}

const fn template(
    category: Category,
    product_type: &'static str,
    min_price: u32,
    max_price: u32,
    image: &'static str,
) -> CategoryTemplate {
    CategoryTemplate {
        category,
        product_type,
        min_price,
        max_price,
        image,
    }
}

const fn brand(local: &'static str, display: &'static str) -> BrandName {
    BrandName { local, display }
}

#[rustfmt::skip]
pub const CATEGORY_TEMPLATES: &[CategoryTemplate] = &[
    template(Category::Electronics, "Smartphone", 150_000, 2_500_000, "/images/phone-{}.jpg"),
    template(Category::Electronics, "Laptop", 800_000, 3_000_000, "/images/laptop-{}.jpg"),
    template(Category::Electronics, "Tablet", 400_000, 1_500_000, "/images/tablet-{}.jpg"),
    template(Category::Electronics, "Earphones", 50_000, 300_000, "/images/earphone-{}.jpg"),
    template(Category::Fashion, "T-Shirt", 15_000, 80_000, "/images/tshirt-{}.jpg"),
    template(Category::Fashion, "Shoes", 50_000, 500_000, "/images/shoes-{}.jpg"),
    template(Category::Fashion, "Bag", 30_000, 4_000_000, "/images/bag-{}.jpg"),
    template(Category::Fashion, "Pants", 20_000, 200_000, "/images/pants-{}.jpg"),
    template(Category::Appliances, "TV", 500_000, 5_000_000, "/images/tv-{}.jpg"),
    template(Category::Appliances, "Refrigerator", 800_000, 2_000_000, "/images/fridge-{}.jpg"),
    template(Category::Appliances, "Washer", 400_000, 1_500_000, "/images/washer-{}.jpg"),
    template(Category::Appliances, "Air Conditioner", 300_000, 1_200_000, "/images/aircon-{}.jpg"),
];

const ELECTRONICS_BRANDS: &[BrandName] = &[
    brand("삼성", "Samsung"),
    brand("애플", "Apple"),
    brand("LG", "LG"),
    brand("소니", "Sony"),
    brand("샤오미", "Xiaomi"),
];

const FASHION_BRANDS: &[BrandName] = &[
    brand("나이키", "Nike"),
    brand("아디다스", "Adidas"),
    brand("유니클로", "Uniqlo"),
    brand("ZARA", "ZARA"),
    brand("구찌", "Gucci"),
];

const APPLIANCE_BRANDS: &[BrandName] = &[
    brand("삼성", "Samsung"),
    brand("LG", "LG"),
    brand("대우", "Daewoo"),
    brand("위니아", "Winia"),
    brand("캐리어", "Carrier"),
];

pub fn brands_for(category: Category) -> &'static [BrandName] {
    match category {
        Category::Electronics => ELECTRONICS_BRANDS,
        Category::Fashion => FASHION_BRANDS,
        Category::Appliances => APPLIANCE_BRANDS,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog size must be at least 1")]
    EmptyCatalog,

    #[error("no category templates provided")]
    NoTemplates,

    #[error("template {product_type} has an empty price range [{min}, {max}]")]
    InvalidPriceRange {
        product_type: &'static str,
        min: u32,
        max: u32,
    },

    #[error("no brands registered for category {0}")]
    NoBrands(Category),
}

/// Read-only product catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Generate `size` products with ids `1..=size`.
    pub fn generate<R: Rng + ?Sized>(
        templates: &[CategoryTemplate],
        size: usize,
        rng: &mut R,
    ) -> Result<Self, CatalogError> {
        if size == 0 {
            return Err(CatalogError::EmptyCatalog);
        }
        if templates.is_empty() {
            return Err(CatalogError::NoTemplates);
        }
        for t in templates {
            if t.min_price > t.max_price {
                return Err(CatalogError::InvalidPriceRange {
                    product_type: t.product_type,
                    min: t.min_price,
                    max: t.max_price,
                });
            }
            if brands_for(t.category).is_empty() {
                return Err(CatalogError::NoBrands(t.category));
            }
        }

        let mut products = Vec::with_capacity(size);
        for id in 1..=size as u64 {
            let t = templates.choose(rng).ok_or(CatalogError::NoTemplates)?;
            let brand = brands_for(t.category)
                .choose(rng)
                .ok_or(CatalogError::NoBrands(t.category))?;
            let price = rng.gen_range(t.min_price..=t.max_price);
            let rating = 3.0 + rng.gen::<f64>() * 2.0;

            products.push(Product {
                id,
                category: t.category,
                product_type: t.product_type.to_string(),
                product_name: format!("{} {} No.{}", brand.local, t.product_type, id),
                price,
                image: t.image.replace("{}", &id.to_string()),
                description: format!("Premium {} {}", t.category, t.product_type),
                brand: brand.display.to_string(),
                rating: format!("{:.1}", rating),
            });
        }

        info!(
            products = products.len(),
            templates = templates.len(),
            "Catalog generated"
        );

        Ok(Self { products })
    }

    /// Wrap an existing product list, e.g. fixtures in tests.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Cheapest products first, ties broken by id.
    ///
    /// Price is a stand-in for popularity until real click statistics are
    /// wired in; do not treat the ordering as a ranking signal.
    pub fn popular(&self, limit: usize) -> Vec<&Product> {
        let mut ranked: Vec<&Product> = self.products.iter().collect();
        ranked.sort_by_key(|p| (p.price, p.id));
        ranked.truncate(limit);
        ranked
    }
}

//! E-commerce partner.

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use perks_shared::models::shopping::{
    Brand, BrandsResponse, CartAddRequest, CartItem, CategoriesResponse, Category, OrderConfirmation, OrderRequest,
    OrderStatus, Product, ProductDetails, ProductSearchCriteria, ProductSearchResponse, ProductSpecifications,
};
use perks_shared::models::status::HealthReport;
use perks_shared::models::CancellationOutcome;
use perks_shared::ServiceKind;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::SimError;
use crate::pricing::{order_totals, product_price, shipping_options, DEFAULT_SHIPPING_COST};
use crate::{cancellation_response, health_report};

const CATEGORIES: &[(&str, &str, [&str; 5])] = &[
    ("electronics", "Electronics", ["smartphones", "laptops", "tablets", "accessories", "gaming"]),
    ("fashion", "Fashion", ["clothing", "shoes", "accessories", "jewelry", "watches"]),
    ("home", "Home & Garden", ["furniture", "decor", "kitchen", "outdoor", "tools"]),
    ("sports", "Sports & Outdoors", ["fitness", "outdoor-gear", "team-sports", "water-sports", "cycling"]),
    ("books", "Books & Media", ["fiction", "non-fiction", "textbooks", "ebooks", "audiobooks"]),
];

/// (name, category, premium)
const BRANDS: &[(&str, &str, bool)] = &[
    ("TechPro", "electronics", true),
    ("StyleMax", "fashion", false),
    ("HomeComfort", "home", false),
    ("SportElite", "sports", true),
    ("ReadWell", "books", false),
    ("LuxuryTech", "electronics", true),
    ("FastFashion", "fashion", false),
    ("PremiumHome", "home", true),
    ("ActiveLife", "sports", false),
    ("KnowledgeBase", "books", true),
];

/// (category, name, base price, rating)
const PRODUCT_TEMPLATES: &[(&str, &str, f64, f64)] = &[
    ("electronics", "Smartphone X1", 699.0, 4.5),
    ("electronics", "Laptop Pro 15", 1299.0, 4.3),
    ("electronics", "Tablet Air", 399.0, 4.2),
    ("electronics", "Wireless Headphones", 199.0, 4.4),
    ("electronics", "Gaming Console", 499.0, 4.6),
    ("electronics", "Smart Watch", 299.0, 4.1),
    ("fashion", "Designer Jeans", 89.0, 4.0),
    ("fashion", "Leather Jacket", 249.0, 4.3),
    ("fashion", "Running Shoes", 129.0, 4.4),
    ("fashion", "Evening Dress", 159.0, 4.2),
    ("fashion", "Casual Shirt", 39.0, 3.9),
    ("fashion", "Winter Coat", 199.0, 4.1),
    ("home", "Coffee Maker Deluxe", 149.0, 4.3),
    ("home", "Dining Table Set", 599.0, 4.0),
    ("home", "Garden Tool Kit", 79.0, 4.2),
    ("home", "Throw Pillow Set", 49.0, 3.8),
    ("home", "LED Floor Lamp", 89.0, 4.1),
    ("home", "Kitchen Knife Set", 99.0, 4.4),
    ("sports", "Yoga Mat Premium", 59.0, 4.3),
    ("sports", "Bicycle Mountain", 899.0, 4.5),
    ("sports", "Tennis Racket Pro", 179.0, 4.2),
    ("sports", "Fitness Tracker", 149.0, 4.0),
    ("sports", "Camping Tent", 299.0, 4.4),
    ("sports", "Basketball Shoes", 119.0, 4.1),
    ("books", "Programming Guide 2024", 49.0, 4.6),
    ("books", "Mystery Novel Collection", 24.0, 4.2),
    ("books", "Cooking Masterclass", 34.0, 4.4),
    ("books", "History of Technology", 39.0, 4.1),
    ("books", "Self-Help Success", 19.0, 3.9),
    ("books", "Art & Design Basics", 44.0, 4.3),
];

const FEATURES: &[&str] = &[
    "Fast delivery",
    "Best seller",
    "Limited edition",
    "Eco-friendly",
    "Premium quality",
    "Customer favorite",
    "New arrival",
    "Sale item",
];

const ORDER_STATES: &[&str] = &["confirmed", "processing", "shipped", "delivered", "cancelled"];

const DEFAULT_LIMIT: usize = 20;

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(categories))
        .route("/brands", get(brands))
        .route("/products/search", get(search_products))
        .route("/products/{product_id}", get(product_details))
        .route("/cart/add", post(add_to_cart))
        .route("/order/create", post(create_order))
        .route("/order/{order_id}", get(order_status))
        .route("/cancel/{order_id}", post(cancel_order))
}

fn brand(name: &str, category: &str, premium: bool) -> Brand {
    Brand {
        name: name.to_string(),
        category: category.to_string(),
        premium,
    }
}

fn subcategories(category: &str) -> &'static [&'static str] {
    CATEGORIES
        .iter()
        .find(|(code, _, _)| *code == category)
        .map(|(_, _, subs)| subs.as_slice())
        .unwrap_or(&[])
}

async fn health() -> Json<HealthReport> {
    health_report(ServiceKind::Shopping)
}

async fn categories() -> Json<CategoriesResponse> {
    let categories: BTreeMap<String, Category> = CATEGORIES
        .iter()
        .map(|(code, name, subs)| {
            (
                code.to_string(),
                Category {
                    name: name.to_string(),
                    subcategories: subs.iter().map(|s| s.to_string()).collect(),
                },
            )
        })
        .collect();
    Json(CategoriesResponse { categories })
}

#[derive(Debug, Default, Deserialize)]
pub struct BrandArgs {
    pub category: Option<String>,
}

async fn brands(Query(args): Query<BrandArgs>) -> Json<BrandsResponse> {
    let category = args.category.map(|c| c.trim().to_ascii_lowercase()).filter(|c| !c.is_empty());
    let brands: Vec<Brand> = BRANDS
        .iter()
        .filter(|(_, cat, _)| category.as_deref().map_or(true, |c| c == *cat))
        .map(|&(name, cat, premium)| brand(name, cat, premium))
        .collect();
    Json(BrandsResponse {
        count: brands.len(),
        brands,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductSearchArgs {
    pub category: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub brand: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
}

/// Normalized product search with its result limit.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub criteria: ProductSearchCriteria,
    pub limit: usize,
}

fn parse_price(field: &str, raw: Option<&str>, default: f64) -> Result<f64, SimError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(SimError::bad_request(format!("{} must be a non-negative number", field))),
        },
    }
}

fn product_filter(args: &ProductSearchArgs) -> Result<ProductFilter, SimError> {
    let limit = match args.limit.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_LIMIT,
        Some(s) => s
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| SimError::bad_request("limit must be a positive integer"))?,
    };
    let sort_by = args.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()).unwrap_or("relevance");
    if !matches!(sort_by, "relevance" | "price_low" | "price_high" | "rating") {
        return Err(SimError::bad_request("sort must be one of relevance, price_low, price_high, rating"));
    }

    Ok(ProductFilter {
        criteria: ProductSearchCriteria {
            category: args.category.as_deref().unwrap_or("").trim().to_ascii_lowercase(),
            query: args.q.as_deref().unwrap_or("").trim().to_string(),
            min_price: parse_price("min_price", args.min_price.as_deref(), 0.0)?,
            max_price: parse_price("max_price", args.max_price.as_deref(), 10000.0)?,
            brand: args.brand.as_deref().unwrap_or("").trim().to_string(),
            sort_by: sort_by.to_string(),
        },
        limit,
    })
}

async fn search_products(Query(args): Query<ProductSearchArgs>) -> Result<Json<ProductSearchResponse>, SimError> {
    let filter = product_filter(&args)?;
    let (products, has_more) = generate_products(&mut rand::thread_rng(), &filter);
    tracing::debug!("{} products for {:?}", products.len(), filter.criteria.query);

    Ok(Json(ProductSearchResponse {
        search_criteria: filter.criteria,
        total_count: products.len(),
        has_more,
        products,
    }))
}

/// Up to two brands per matching template; an unknown category searches all of them.
///
/// Returns the first `limit` products and whether more matched.
pub fn generate_products<R: Rng + ?Sized>(rng: &mut R, filter: &ProductFilter) -> (Vec<Product>, bool) {
    let criteria = &filter.criteria;
    let known_category = CATEGORIES.iter().any(|(code, _, _)| *code == criteria.category);
    let query = criteria.query.to_lowercase();

    let mut products = Vec::new();
    for &(category, template, base_price, rating) in PRODUCT_TEMPLATES {
        if known_category && category != criteria.category {
            continue;
        }
        let brands = BRANDS
            .iter()
            .filter(|(_, cat, _)| *cat == category)
            .filter(|(name, _, _)| criteria.brand.is_empty() || name.eq_ignore_ascii_case(&criteria.brand))
            .take(2);

        for &(brand_name, _, premium) in brands {
            if !query.is_empty()
                && !template.to_lowercase().contains(&query)
                && !brand_name.to_lowercase().contains(&query)
            {
                continue;
            }

            let discounted = rng.gen_bool(0.3);
            let price = product_price(rng, base_price, premium, discounted);
            if price.price < criteria.min_price || price.price > criteria.max_price {
                continue;
            }

            let in_stock = rng.gen_bool(0.8);
            let feature_count = rng.gen_range(1..=3);
            products.push(Product {
                product_id: uuid::Uuid::new_v4().to_string(),
                name: format!("{} {}", brand_name, template),
                category: category.to_string(),
                subcategory: subcategories(category).choose(rng).unwrap_or(&"general").to_string(),
                brand: brand_name.to_string(),
                price: price.price,
                original_price: price.original_price,
                discount_percent: price.discount_percent,
                rating: ((rating + rng.gen_range(-0.3..=0.3)).clamp(1.0, 5.0) * 10.0).round() / 10.0,
                review_count: rng.gen_range(10..=1000),
                in_stock,
                stock_quantity: if in_stock { rng.gen_range(1..=100) } else { 0 },
                shipping_options: shipping_options(price.price),
                features: FEATURES.choose_multiple(rng, feature_count).map(|f| f.to_string()).collect(),
                images: vec![format!("https://example.com/images/{}.jpg", uuid::Uuid::new_v4())],
                description: format!(
                    "High-quality {} from {}. Perfect for your {} needs.",
                    template, brand_name, category
                ),
            });
        }
    }

    match criteria.sort_by.as_str() {
        "price_low" => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        "price_high" => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        "rating" => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        _ => {
            // relevance: rating with some noise
            let mut keyed: Vec<(f64, Product)> = products
                .into_iter()
                .map(|p| (p.rating * rng.gen_range(0.8..=1.2), p))
                .collect();
            keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
            products = keyed.into_iter().map(|(_, p)| p).collect();
        }
    }

    let has_more = products.len() > filter.limit;
    products.truncate(filter.limit);
    (products, has_more)
}

async fn product_details(Path(product_id): Path<String>) -> Json<ProductDetails> {
    Json(describe_product(&mut rand::thread_rng(), product_id))
}

pub fn describe_product<R: Rng + ?Sized>(rng: &mut R, product_id: String) -> ProductDetails {
    let &(category, template, base_price, rating) = PRODUCT_TEMPLATES.choose(rng).unwrap_or(&PRODUCT_TEMPLATES[0]);
    let candidates: Vec<&(&str, &str, bool)> = BRANDS.iter().filter(|(_, cat, _)| *cat == category).collect();
    let &&(brand_name, _, premium) = candidates.choose(rng).unwrap_or(&&BRANDS[0]);
    let price = product_price(rng, base_price, premium, false).price;
    let image_count = rng.gen_range(2..=6);

    ProductDetails {
        product_id,
        name: format!("{} {}", brand_name, template),
        category: category.to_string(),
        brand: brand_name.to_string(),
        price,
        rating,
        review_count: rng.gen_range(50..=2000),
        in_stock: true,
        stock_quantity: rng.gen_range(5..=50),
        shipping_options: shipping_options(price),
        specifications: ProductSpecifications {
            weight: format!("{:.1} lbs", rng.gen_range(0.1..=10.0_f64)),
            dimensions: format!(
                "{}x{}x{} inches",
                rng.gen_range(5..=20),
                rng.gen_range(5..=20),
                rng.gen_range(1..=10)
            ),
            warranty: format!("{} years", [1, 2, 3, 5].choose(rng).unwrap_or(&1)),
            material: ["Plastic", "Metal", "Wood", "Fabric", "Glass", "Composite"]
                .choose(rng)
                .unwrap_or(&"Plastic")
                .to_string(),
        },
        images: (0..image_count)
            .map(|_| format!("https://example.com/images/{}.jpg", uuid::Uuid::new_v4()))
            .collect(),
        description: format!(
            "Premium {} from {}. Excellent quality and performance.",
            template, brand_name
        ),
        related_products: (0..4).map(|_| uuid::Uuid::new_v4().to_string()).collect(),
    }
}

async fn add_to_cart(payload: Result<Json<CartAddRequest>, JsonRejection>) -> Result<Json<CartItem>, SimError> {
    let Json(request) = payload?;
    if request.product_id.trim().is_empty() {
        return Err(SimError::bad_request("Missing required fields: product_id"));
    }
    if request.quantity == 0 {
        return Err(SimError::bad_request("quantity must be at least 1"));
    }

    Ok(Json(CartItem {
        cart_item_id: uuid::Uuid::new_v4().to_string(),
        product_id: request.product_id,
        quantity: request.quantity,
        added_at: Utc::now(),
        status: "added".to_string(),
    }))
}

async fn create_order(
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderConfirmation>, SimError> {
    let Json(request) = payload?;
    if request.items.is_empty() {
        return Err(SimError::bad_request("Order must contain at least one item"));
    }
    let shipping_cost = request.shipping_cost.unwrap_or(DEFAULT_SHIPPING_COST);
    if !shipping_cost.is_finite() || shipping_cost < 0.0 {
        return Err(SimError::bad_request("shipping_cost must be a non-negative amount"));
    }
    if request.items.iter().any(|line| !line.price.is_finite() || line.price < 0.0) {
        return Err(SimError::bad_request("item price must be a non-negative amount"));
    }

    let (order_id, delivery_days, tracking) = {
        let mut rng = rand::thread_rng();
        (
            format!("ORD{}", rng.gen_range(100000..=999999)),
            rng.gen_range(3..=10),
            tracking_number(&mut rng),
        )
    };
    let now = Utc::now();
    let totals = order_totals(request.items, shipping_cost);
    tracing::info!("Order {} created, total {}", order_id, totals.total);

    Ok(Json(OrderConfirmation {
        order_id,
        status: "confirmed".to_string(),
        order_details: totals,
        shipping_address: request.shipping_address,
        estimated_delivery: now.date_naive() + Duration::days(delivery_days),
        tracking_number: tracking,
        order_date: now,
    }))
}

fn tracking_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("TRK{}", rng.gen_range(1_000_000_000_u64..=9_999_999_999))
}

async fn order_status(Path(order_id): Path<String>) -> Json<OrderStatus> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    Json(OrderStatus {
        order_id,
        status: ORDER_STATES.choose(&mut rng).unwrap_or(&"confirmed").to_string(),
        order_date: now - Duration::days(rng.gen_range(1..=30)),
        total_amount: rng.gen_range(50..=500) as f64,
        items_count: rng.gen_range(1..=5),
        tracking_number: tracking_number(&mut rng),
        estimated_delivery: now.date_naive() + Duration::days(rng.gen_range(1..=10)),
    })
}

async fn cancel_order(Path(order_id): Path<String>) -> (StatusCode, Json<CancellationOutcome>) {
    cancellation_response(cancellation(&mut rand::thread_rng(), order_id))
}

/// Four in five cancellations go through; the fee depends on how far the order got.
pub fn cancellation<R: Rng + ?Sized>(rng: &mut R, order_id: String) -> CancellationOutcome {
    if !rng.gen_bool(0.8) {
        return CancellationOutcome {
            success: false,
            reference: order_id,
            status: None,
            original_status: None,
            original_amount: None,
            cancellation_fee: None,
            refund_amount: None,
            processing_time: None,
            message: "Please initiate a return instead".to_string(),
            error: Some("Cannot cancel - order already delivered or out for delivery".to_string()),
        };
    }

    let current = *["confirmed", "processing", "shipped"].choose(rng).unwrap_or(&"confirmed");
    let original_amount = rng.gen_range(50..=800) as f64;
    let fee = match current {
        "confirmed" => 0.0,
        "processing" => rng.gen_range(5..=25) as f64,
        _ => rng.gen_range(15..=50) as f64,
    };
    CancellationOutcome {
        success: true,
        reference: order_id,
        status: Some("cancelled".to_string()),
        original_status: Some(current.to_string()),
        original_amount: Some(original_amount),
        cancellation_fee: Some(fee),
        refund_amount: Some(original_amount - fee),
        processing_time: Some("1-3 business days".to_string()),
        message: format!("Order cancelled successfully. Was in {} status.", current),
        error: None,
    }
}

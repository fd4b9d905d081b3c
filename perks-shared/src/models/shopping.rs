use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Validate;
use crate::money::check_amount;
use crate::pii::Masked;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: BTreeMap<String, Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Brand {
    pub name: String,
    pub category: String,
    pub premium: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandsResponse {
    pub brands: Vec<Brand>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingOption {
    pub method: String,
    pub name: String,
    pub cost: f64,
    pub delivery_days: String,
    pub free_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_percent: f64,
    pub rating: f64,
    pub review_count: u32,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub shipping_options: Vec<ShippingOption>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSearchCriteria {
    pub category: String,
    pub query: String,
    pub min_price: f64,
    pub max_price: f64,
    pub brand: String,
    pub sort_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchResponse {
    pub search_criteria: ProductSearchCriteria,
    pub products: Vec<Product>,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSpecifications {
    pub weight: String,
    pub dimensions: String,
    pub warranty: String,
    pub material: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: f64,
    pub rating: f64,
    pub review_count: u32,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub shipping_options: Vec<ShippingOption>,
    pub specifications: ProductSpecifications,
    pub images: Vec<String>,
    pub description: String,
    pub related_products: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub shipping_address: serde_json::Value,
    pub payment_method: Masked<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTotals {
    pub items: Vec<OrderLine>,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub tax: f64,
    pub total: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub status: String,
    pub order_details: OrderTotals,
    pub shipping_address: serde_json::Value,
    pub estimated_delivery: NaiveDate,
    pub tracking_number: String,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatus {
    pub order_id: String,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub items_count: u32,
    pub tracking_number: String,
    pub estimated_delivery: NaiveDate,
}

impl Validate for CategoriesResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for BrandsResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for ShippingOption {
    fn validate(&self) -> Result<(), String> {
        check_amount("shipping cost", self.cost)
    }
}

impl Validate for Product {
    fn validate(&self) -> Result<(), String> {
        check_amount("price", self.price)?;
        check_amount("original_price", self.original_price)?;
        self.shipping_options.validate()
    }
}

impl Validate for ProductSearchResponse {
    fn validate(&self) -> Result<(), String> {
        self.products.validate()
    }
}

impl Validate for ProductDetails {
    fn validate(&self) -> Result<(), String> {
        check_amount("price", self.price)?;
        self.shipping_options.validate()
    }
}

impl Validate for CartItem {
    fn validate(&self) -> Result<(), String> {
        if self.quantity == 0 {
            return Err("cart item with zero quantity".to_string());
        }
        Ok(())
    }
}

impl Validate for OrderConfirmation {
    fn validate(&self) -> Result<(), String> {
        let totals = &self.order_details;
        check_amount("subtotal", totals.subtotal)?;
        check_amount("shipping_cost", totals.shipping_cost)?;
        check_amount("tax", totals.tax)?;
        check_amount("total", totals.total)
    }
}

impl Validate for OrderStatus {
    fn validate(&self) -> Result<(), String> {
        check_amount("total_amount", self.total_amount)
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Product;

fn default_margin() -> f64 {
    20.0
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "category is required"))]
    pub category: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i64,
    #[validate(range(min = 1, message = "quantity must be a positive integer"))]
    pub quantity: i32,
    #[serde(default = "default_margin")]
    #[validate(range(min = 0.0, message = "margin_percentage cannot be negative"))]
    pub margin_percentage: f64,
    #[validate(url(message = "image must be a URL"))]
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: Option<i64>,
    #[validate(range(min = 1, message = "quantity must be a positive integer"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0.0, message = "margin_percentage cannot be negative"))]
    pub margin_percentage: Option<f64>,
    #[validate(url(message = "image must be a URL"))]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

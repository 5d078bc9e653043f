use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Category;
use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub price: i64,
    pub market_price: Option<i64>,
    pub price_to_sell: Option<i64>,
    pub price_per_piece: Option<i64>,
    pub price_per_packet: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<i64>,
    pub market_price: Option<i64>,
    pub price_to_sell: Option<i64>,
    pub price_per_piece: Option<i64>,
    pub price_per_packet: Option<i64>,
    pub images: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

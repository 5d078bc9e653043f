use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Category, OrderStatus, PaymentStatus, Pricing, ProductSnapshot, UnitType};

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub price: i64,
    pub market_price: Option<i64>,
    pub price_to_sell: Option<i64>,
    pub price_per_piece: Option<i64>,
    pub price_per_packet: Option<i64>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The pricing variant matching this product's category.
    pub fn pricing(&self) -> Pricing {
        match self.category {
            Category::Book => Pricing::Book {
                price_to_sell: self.price_to_sell,
                market_price: self.market_price,
                price: self.price,
            },
            Category::Stationery | Category::Gift | Category::Sport => Pricing::Unit {
                per_piece: self.price_per_piece,
                per_packet: self.price_per_packet,
                price: self.price,
            },
        }
    }

    /// First image, used as the thumbnail everywhere a single image is shown.
    pub fn thumbnail(&self) -> Option<String> {
        self.images.first().cloned()
    }

    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id,
            name: self.name.clone(),
            image: self.thumbnail(),
            category: self.category,
            pricing: self.pricing(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub category: Category,
    pub unit_type: Option<UnitType>,
    pub quantity: i32,
    pub unit_price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub invoice_number: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A frozen copy of a cart line at checkout time. Never re-joined against
/// the live catalog; later product edits do not reach past orders.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub unit_type: Option<UnitType>,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

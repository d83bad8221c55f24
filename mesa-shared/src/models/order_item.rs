/// Order-item model
///
/// A quantity of one menu entry within an order. Both references are
/// checked for existence at write time. The `unit_price` is a snapshot
/// taken at ordering time; invoice aggregation prices through the
/// referenced menu entry.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// External ID, derived once at creation
    pub order_item_id: String,

    /// External ID of the order this item belongs to
    pub order_id: String,

    /// External ID of the ordered menu entry
    pub menu_id: String,

    pub quantity: i32,

    /// Price per unit at ordering time
    pub unit_price: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for OrderItem {
    const COLLECTION: &'static str = "order_items";

    fn external_id(&self) -> &str {
        &self.order_item_id
    }
}

/// Input for creating an order-item; the numeric fields must be present
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderItem {
    #[validate(length(min = 1, message = "order_id must not be empty"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "menu_id must not be empty"))]
    pub menu_id: String,

    #[validate(
        required(message = "quantity is required"),
        range(min = 1, message = "quantity must be at least 1")
    )]
    pub quantity: Option<i32>,

    #[validate(
        required(message = "unit_price is required"),
        range(min = 0.0, message = "unit_price must not be negative")
    )]
    pub unit_price: Option<f64>,
}

impl OrderItem {
    pub fn create(data: CreateOrderItem) -> Self {
        let now = Utc::now();
        Self {
            order_item_id: super::external_id(Uuid::new_v4()),
            order_id: data.order_id,
            menu_id: data.menu_id,
            quantity: data.quantity.unwrap_or_default(),
            unit_price: data.unit_price.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an order-item
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

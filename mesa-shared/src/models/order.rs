/// Order model
///
/// An order optionally references the table it was placed at. The table
/// reference is checked for existence at write time; the store itself
/// enforces nothing.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// External ID, derived once at creation
    pub order_id: String,

    /// External ID of the table this order was placed at, if any
    pub table_id: Option<String>,

    /// When the order was placed; defaults to the creation instant
    pub order_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";

    fn external_id(&self) -> &str {
        &self.order_id
    }
}

/// Input for creating an order
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateOrder {
    #[validate(length(min = 1, message = "table_id must not be empty"))]
    pub table_id: Option<String>,

    pub order_date: Option<DateTime<Utc>>,
}

impl Order {
    pub fn create(data: CreateOrder) -> Self {
        let now = Utc::now();
        Self {
            order_id: super::external_id(Uuid::new_v4()),
            table_id: data.table_id,
            order_date: data.order_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an order; only the table reference is mutable
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

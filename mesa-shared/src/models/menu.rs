/// Menu model
///
/// A menu entry is a priced item in a category, optionally limited to a
/// validity window (e.g. a seasonal card). The invoice aggregation prices
/// order-items through the referenced menu entry.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    /// External ID, derived once at creation
    pub menu_id: String,

    pub name: String,

    pub category: String,

    /// Unit price used when aggregating invoices
    pub price: f64,

    /// Start of the validity window, if any
    pub start_date: Option<DateTime<Utc>>,

    /// End of the validity window, if any
    pub end_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Menu {
    const COLLECTION: &'static str = "menus";

    fn external_id(&self) -> &str {
        &self.menu_id
    }
}

/// Input for creating a menu entry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenu {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: String,

    #[validate(required(message = "price is required"))]
    pub price: Option<f64>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Menu {
    pub fn create(data: CreateMenu) -> Self {
        let now = Utc::now();
        Self {
            menu_id: super::external_id(Uuid::new_v4()),
            name: data.name,
            category: data.category,
            price: data.price.unwrap_or_default(),
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a menu entry
///
/// Only present fields are applied. A patch supplying both dates must
/// pass [`validity_window_is_open`] before it is accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct MenuPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Whether a validity window is orderly and still open at `now`
///
/// The start must precede the end and the end must not already be in the
/// past.
pub fn validity_window_is_open(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    start < end && end > now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_stamps_identity_and_timestamps() {
        let menu = Menu::create(CreateMenu {
            name: "espresso".to_string(),
            category: "drinks".to_string(),
            price: Some(2.5),
            start_date: None,
            end_date: None,
        });

        assert_eq!(menu.menu_id.len(), 32);
        assert_eq!(menu.price, 2.5);
        assert_eq!(menu.created_at, menu.updated_at);
    }

    #[test]
    fn test_window_open() {
        let now = Utc::now();
        assert!(validity_window_is_open(
            now - Duration::days(1),
            now + Duration::days(1),
            now
        ));
    }

    #[test]
    fn test_window_rejects_inverted_dates() {
        let now = Utc::now();
        assert!(!validity_window_is_open(
            now + Duration::days(2),
            now + Duration::days(1),
            now
        ));
    }

    #[test]
    fn test_window_rejects_expired() {
        let now = Utc::now();
        assert!(!validity_window_is_open(
            now - Duration::days(2),
            now - Duration::days(1),
            now
        ));
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = MenuPatch {
            price: Some(3.0),
            ..Default::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"price": 3.0}));
    }
}

/// Table model
///
/// A physical table with a number and guest capacity. Orders may
/// reference a table; the invoice view surfaces its number.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// External ID, derived once at creation
    pub table_id: String,

    pub table_number: i32,

    pub number_of_guests: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Table {
    const COLLECTION: &'static str = "tables";

    fn external_id(&self) -> &str {
        &self.table_id
    }
}

/// Input for creating a table; both numeric fields must be present
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTable {
    #[validate(required(message = "table_number is required"))]
    pub table_number: Option<i32>,

    #[validate(required(message = "number_of_guests is required"))]
    pub number_of_guests: Option<i32>,
}

impl Table {
    pub fn create(data: CreateTable) -> Self {
        let now = Utc::now();
        Self {
            table_id: super::external_id(Uuid::new_v4()),
            table_number: data.table_number.unwrap_or_default(),
            number_of_guests: data.number_of_guests.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_stamps_identity_and_timestamps() {
        let table = Table::create(CreateTable {
            table_number: Some(7),
            number_of_guests: Some(4),
        });

        assert_eq!(table.table_id.len(), 32);
        assert_eq!(table.table_number, 7);
        assert_eq!(table.number_of_guests, 4);
        assert_eq!(table.created_at, table.updated_at);
    }

    #[test]
    fn test_create_rejects_missing_numbers() {
        let payload = CreateTable {
            table_number: None,
            number_of_guests: Some(4),
        };

        assert!(payload.validate().is_err());
    }
}

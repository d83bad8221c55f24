/// Invoice model
///
/// An invoice tracks payment state for one order. The due date is always
/// creation time plus one day and is never user-suppliable; the payment
/// status defaults to `PENDING` when unset.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::store::Document;

/// Payment state of an invoice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// External ID, derived once at creation
    pub invoice_id: String,

    /// External ID of the invoiced order
    pub order_id: String,

    /// How the invoice is being settled, once known
    pub payment_method: Option<String>,

    pub payment_status: PaymentStatus,

    /// Always creation time + 1 day
    pub payment_due_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Invoice {
    const COLLECTION: &'static str = "invoices";

    fn external_id(&self) -> &str {
        &self.invoice_id
    }
}

/// Input for creating an invoice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoice {
    #[validate(length(min = 1, message = "order_id must not be empty"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "payment_method must not be empty"))]
    pub payment_method: Option<String>,

    pub payment_status: Option<PaymentStatus>,
}

impl Invoice {
    pub fn create(data: CreateInvoice) -> Self {
        let now = Utc::now();
        Self {
            invoice_id: super::external_id(Uuid::new_v4()),
            order_id: data.order_id,
            payment_method: data.payment_method,
            payment_status: data.payment_status.unwrap_or_default(),
            payment_due_date: now + Duration::days(1),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an invoice
///
/// The order reference and due date are not updatable.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

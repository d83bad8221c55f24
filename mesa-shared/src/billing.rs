/// Order-to-invoice aggregation
///
/// Assembles the read-only invoice view: the invoice's order is resolved,
/// its order-items are joined back through their menu entries for
/// per-item prices, and the payment total and table number are computed
/// on the way. The joins are plain reads over the collections; a racing
/// write may be reflected partially, which is acceptable for a display
/// view.
///
/// Any dangling reference (order, menu entry, or table) aborts the whole
/// aggregation with a descriptive error rather than producing a partially
/// populated view. An order with zero items is not an error: the view
/// carries an empty `order_details` and a total of zero.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::store::{Filter, Store, StoreError};
use crate::models::invoice::{Invoice, PaymentStatus};
use crate::models::menu::Menu;
use crate::models::order_item::OrderItem;

/// Error type for invoice aggregation
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// The invoice references an order that does not exist
    #[error("order `{0}` referenced by the invoice does not exist")]
    MissingOrder(String),

    /// An order-item references a menu entry that does not exist
    #[error("menu entry `{0}` referenced by an order-item does not exist")]
    MissingMenu(String),

    /// The order references a table that does not exist
    #[error("table `{0}` referenced by the order does not exist")]
    MissingTable(String),

    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One priced line of the invoice view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Menu entry name
    pub name: String,

    /// Current menu price per unit
    pub price: f64,

    pub quantity: i32,

    /// quantity × price
    pub amount: f64,
}

/// Consolidated, display-ready view of an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceView {
    pub invoice_id: String,

    /// `"null"` marker when no payment method has been set yet
    pub payment_method: String,

    pub order_id: String,

    pub payment_status: PaymentStatus,

    /// Sum of quantity × menu price across all order-items
    pub payment_due: f64,

    /// Number of the table the order was placed at, if any
    pub table_number: Option<i32>,

    pub payment_due_date: DateTime<Utc>,

    pub order_details: Vec<OrderLine>,
}

/// Projects order-items joined with their menu entries into priced lines
/// and the payment total
fn project_lines(pairs: &[(OrderItem, Menu)]) -> (Vec<OrderLine>, f64) {
    let lines: Vec<OrderLine> = pairs
        .iter()
        .map(|(item, menu)| OrderLine {
            name: menu.name.clone(),
            price: menu.price,
            quantity: item.quantity,
            amount: f64::from(item.quantity) * menu.price,
        })
        .collect();

    let payment_due = lines.iter().map(|line| line.amount).sum();
    (lines, payment_due)
}

/// Assembles the invoice view for an already-resolved invoice
///
/// # Errors
///
/// - [`BillingError::MissingOrder`] / [`BillingError::MissingMenu`] /
///   [`BillingError::MissingTable`] when a reference is dangling
/// - [`BillingError::Store`] when the store fails or times out
pub async fn assemble_invoice_view(
    store: &Store,
    invoice: &Invoice,
) -> Result<InvoiceView, BillingError> {
    let order = store
        .orders
        .find(Filter::by("order_id", invoice.order_id.as_str()))
        .await?
        .ok_or_else(|| BillingError::MissingOrder(invoice.order_id.clone()))?;

    let items = store
        .order_items
        .list(Filter::by("order_id", order.order_id.as_str()))
        .await?;

    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        let menu = store
            .menus
            .find(Filter::by("menu_id", item.menu_id.as_str()))
            .await?
            .ok_or_else(|| BillingError::MissingMenu(item.menu_id.clone()))?;
        pairs.push((item, menu));
    }

    let table_number = match &order.table_id {
        Some(table_id) => {
            let table = store
                .tables
                .find(Filter::by("table_id", table_id.as_str()))
                .await?
                .ok_or_else(|| BillingError::MissingTable(table_id.clone()))?;
            Some(table.table_number)
        }
        None => None,
    };

    let (order_details, payment_due) = project_lines(&pairs);

    Ok(InvoiceView {
        invoice_id: invoice.invoice_id.clone(),
        payment_method: invoice
            .payment_method
            .clone()
            .unwrap_or_else(|| "null".to_string()),
        order_id: order.order_id,
        payment_status: invoice.payment_status,
        payment_due,
        table_number,
        payment_due_date: invoice.payment_due_date,
        order_details,
    })
}

/// Invoice endpoints
///
/// - `GET /invoices` - paginated listing of raw invoice records
/// - `GET /invoice/:invoice_id` - the aggregated invoice view
/// - `POST /invoices` - create (bearer)
/// - `PATCH /invoice/:invoice_id` - partial update (bearer)
///
/// The single-invoice read is the order-to-invoice aggregation: the
/// order, its items, their menu entries, and the table are joined into
/// one display-ready view with the computed payment total.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    pagination::{PageParams, Paged},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mesa_shared::billing::{assemble_invoice_view, InvoiceView};
use mesa_shared::db::store::Filter;
use mesa_shared::models::invoice::{CreateInvoice, Invoice, InvoicePatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInvoiceResponse {
    pub invoice_id: String,
}

/// Lists invoices as a paginated envelope
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paged<Invoice>>> {
    let total_count = state.store.invoices.count(Filter::all()).await?;

    let (offset, limit) = page.window();
    let items = state
        .store
        .invoices
        .list_window(Filter::all(), offset, limit)
        .await?;

    Ok(Json(Paged { total_count, items }))
}

/// Fetches the aggregated view of one invoice
///
/// # Errors
///
/// - `404 Not Found`: the invoice is absent, or one of its references
///   (order, menu entry, table) dangles - the view is never partially
///   populated
/// - `500 Internal Server Error`: store failure
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> ApiResult<Json<InvoiceView>> {
    let invoice = state
        .store
        .invoices
        .get(Filter::by("invoice_id", invoice_id.as_str()))
        .await?;

    let view = assemble_invoice_view(&state.store, &invoice).await?;

    Ok(Json(view))
}

/// Creates an invoice
///
/// The referenced order must exist. `payment_status` defaults to
/// `PENDING` and the due date is stamped as creation time plus one day;
/// neither the due date nor the order reference can be changed later.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the referenced order does
///   not exist
/// - `500 Internal Server Error`: store failure
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(req): Json<CreateInvoice>,
) -> ApiResult<Json<CreateInvoiceResponse>> {
    req.validate()?;

    let order = state
        .store
        .orders
        .find(Filter::by("order_id", req.order_id.as_str()))
        .await?;
    if order.is_none() {
        return Err(ApiError::UnknownReference(format!(
            "order `{}` does not exist",
            req.order_id
        )));
    }

    let invoice = Invoice::create(req);
    let invoice_id = state.store.invoices.insert(&invoice).await?;

    Ok(Json(CreateInvoiceResponse { invoice_id }))
}

/// Partially updates an invoice; returns the updated record
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Json(req): Json<InvoicePatch>,
) -> ApiResult<Json<Invoice>> {
    let updated = state
        .store
        .invoices
        .update(Filter::by("invoice_id", invoice_id.as_str()), &req)
        .await?;

    Ok(Json(updated))
}

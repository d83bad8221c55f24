/// Order endpoints
///
/// - `GET /orders` - paginated listing
/// - `GET /order/:order_id` - single record
/// - `POST /orders` - create (bearer)
/// - `PATCH /order/:order_id` - partial update (bearer)
///
/// A supplied table reference is checked for existence before anything
/// is written; the store itself enforces no referential integrity.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    pagination::{PageParams, Paged},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mesa_shared::db::store::Filter;
use mesa_shared::models::order::{CreateOrder, Order, OrderPatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
}

async fn ensure_table_exists(state: &AppState, table_id: &str) -> ApiResult<()> {
    let table = state
        .store
        .tables
        .find(Filter::by("table_id", table_id))
        .await?;

    if table.is_none() {
        return Err(ApiError::UnknownReference(format!(
            "table `{}` does not exist",
            table_id
        )));
    }
    Ok(())
}

/// Lists orders as a paginated envelope
pub async fn list_orders(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paged<Order>>> {
    let total_count = state.store.orders.count(Filter::all()).await?;

    let (offset, limit) = page.window();
    let items = state
        .store
        .orders
        .list_window(Filter::all(), offset, limit)
        .await?;

    Ok(Json(Paged { total_count, items }))
}

/// Fetches one order by external ID
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Order>> {
    let order = state
        .store
        .orders
        .get(Filter::by("order_id", order_id.as_str()))
        .await?;

    Ok(Json(order))
}

/// Creates an order
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the referenced table does
///   not exist
/// - `500 Internal Server Error`: store failure
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrder>,
) -> ApiResult<Json<CreateOrderResponse>> {
    req.validate()?;

    if let Some(table_id) = &req.table_id {
        ensure_table_exists(&state, table_id).await?;
    }

    let order = Order::create(req);
    let order_id = state.store.orders.insert(&order).await?;

    Ok(Json(CreateOrderResponse { order_id }))
}

/// Partially updates an order; returns the updated record
///
/// A newly supplied table reference is revalidated before the write.
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(req): Json<OrderPatch>,
) -> ApiResult<Json<Order>> {
    if let Some(table_id) = &req.table_id {
        ensure_table_exists(&state, table_id).await?;
    }

    let updated = state
        .store
        .orders
        .update(Filter::by("order_id", order_id.as_str()), &req)
        .await?;

    Ok(Json(updated))
}

/// Order-item endpoints
///
/// - `GET /orderItems` - paginated listing
/// - `GET /orderItem/:order_item_id` - single record
/// - `GET /orderItems-order/:order_id` - all items of one order
/// - `POST /orderItems` - create (bearer)
/// - `PATCH /orderItem/:order_item_id` - partial update (bearer)
///
/// Both references (order and menu entry) are checked for existence at
/// write time.
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
use mesa_shared::models::order_item::{CreateOrderItem, OrderItem, OrderItemPatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderItemResponse {
    pub order_item_id: String,
}

async fn ensure_order_exists(state: &AppState, order_id: &str) -> ApiResult<()> {
    let order = state
        .store
        .orders
        .find(Filter::by("order_id", order_id))
        .await?;

    if order.is_none() {
        return Err(ApiError::UnknownReference(format!(
            "order `{}` does not exist",
            order_id
        )));
    }
    Ok(())
}

async fn ensure_menu_exists(state: &AppState, menu_id: &str) -> ApiResult<()> {
    let menu = state
        .store
        .menus
        .find(Filter::by("menu_id", menu_id))
        .await?;

    if menu.is_none() {
        return Err(ApiError::UnknownReference(format!(
            "menu entry `{}` does not exist",
            menu_id
        )));
    }
    Ok(())
}

/// Lists order-items as a paginated envelope
pub async fn list_order_items(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paged<OrderItem>>> {
    let total_count = state.store.order_items.count(Filter::all()).await?;

    let (offset, limit) = page.window();
    let items = state
        .store
        .order_items
        .list_window(Filter::all(), offset, limit)
        .await?;

    Ok(Json(Paged { total_count, items }))
}

/// Fetches one order-item by external ID
pub async fn get_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<String>,
) -> ApiResult<Json<OrderItem>> {
    let item = state
        .store
        .order_items
        .get(Filter::by("order_item_id", order_item_id.as_str()))
        .await?;

    Ok(Json(item))
}

/// Lists every item belonging to one order
///
/// An order with no items answers with an empty list, not an error.
pub async fn list_order_items_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Vec<OrderItem>>> {
    let items = state
        .store
        .order_items
        .list(Filter::by("order_id", order_id.as_str()))
        .await?;

    Ok(Json(items))
}

/// Creates an order-item
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the referenced order or
///   menu entry does not exist
/// - `500 Internal Server Error`: store failure
pub async fn create_order_item(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderItem>,
) -> ApiResult<Json<CreateOrderItemResponse>> {
    req.validate()?;

    ensure_order_exists(&state, &req.order_id).await?;
    ensure_menu_exists(&state, &req.menu_id).await?;

    let item = OrderItem::create(req);
    let order_item_id = state.store.order_items.insert(&item).await?;

    Ok(Json(CreateOrderItemResponse { order_item_id }))
}

/// Partially updates an order-item; returns the updated record
///
/// A newly supplied menu reference is revalidated before the write.
pub async fn update_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<String>,
    Json(req): Json<OrderItemPatch>,
) -> ApiResult<Json<OrderItem>> {
    if let Some(menu_id) = &req.menu_id {
        ensure_menu_exists(&state, menu_id).await?;
    }

    let updated = state
        .store
        .order_items
        .update(Filter::by("order_item_id", order_item_id.as_str()), &req)
        .await?;

    Ok(Json(updated))
}

/// Menu endpoints
///
/// - `GET /menus` - paginated listing
/// - `GET /menu/:menu_id` - single record
/// - `POST /menus` - create (bearer)
/// - `PATCH /menu/:menu_id` - partial update (bearer)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    pagination::{PageParams, Paged},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use mesa_shared::db::store::Filter;
use mesa_shared::models::menu::{validity_window_is_open, CreateMenu, Menu, MenuPatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMenuResponse {
    pub menu_id: String,
}

/// Lists menu entries as a paginated envelope
pub async fn list_menus(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paged<Menu>>> {
    let total_count = state.store.menus.count(Filter::all()).await?;

    let (offset, limit) = page.window();
    let items = state
        .store
        .menus
        .list_window(Filter::all(), offset, limit)
        .await?;

    Ok(Json(Paged { total_count, items }))
}

/// Fetches one menu entry by external ID
pub async fn get_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
) -> ApiResult<Json<Menu>> {
    let menu = state
        .store
        .menus
        .get(Filter::by("menu_id", menu_id.as_str()))
        .await?;

    Ok(Json(menu))
}

/// Creates a menu entry
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `500 Internal Server Error`: store failure
pub async fn create_menu(
    State(state): State<AppState>,
    Json(req): Json<CreateMenu>,
) -> ApiResult<Json<CreateMenuResponse>> {
    req.validate()?;

    let menu = Menu::create(req);
    let menu_id = state.store.menus.insert(&menu).await?;

    Ok(Json(CreateMenuResponse { menu_id }))
}

/// Partially updates a menu entry
///
/// A patch supplying both `start_date` and `end_date` must describe a
/// window that is orderly and not already expired; it is rejected before
/// anything is written otherwise. Returns the updated record.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or unacceptable window
/// - `404 Not Found`: no such menu entry
/// - `500 Internal Server Error`: store failure
pub async fn update_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    Json(req): Json<MenuPatch>,
) -> ApiResult<Json<Menu>> {
    req.validate()?;

    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        if !validity_window_is_open(start, end, Utc::now()) {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "start_date".to_string(),
                message: "validity window must start before it ends and must not be expired"
                    .to_string(),
            }]));
        }
    }

    let updated = state
        .store
        .menus
        .update(Filter::by("menu_id", menu_id.as_str()), &req)
        .await?;

    Ok(Json(updated))
}

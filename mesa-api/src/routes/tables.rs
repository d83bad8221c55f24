/// Table endpoints
///
/// - `GET /tables` - paginated listing
/// - `GET /table/:table_id` - single record
/// - `POST /tables` - create (bearer)
/// - `PATCH /table/:table_id` - partial update (bearer)
use crate::{
    app::AppState,
    error::ApiResult,
    pagination::{PageParams, Paged},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mesa_shared::db::store::Filter;
use mesa_shared::models::table::{CreateTable, Table, TablePatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTableResponse {
    pub table_id: String,
}

/// Lists tables as a paginated envelope
pub async fn list_tables(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paged<Table>>> {
    let total_count = state.store.tables.count(Filter::all()).await?;

    let (offset, limit) = page.window();
    let items = state
        .store
        .tables
        .list_window(Filter::all(), offset, limit)
        .await?;

    Ok(Json(Paged { total_count, items }))
}

/// Fetches one table by external ID
pub async fn get_table(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<Table>> {
    let table = state
        .store
        .tables
        .get(Filter::by("table_id", table_id.as_str()))
        .await?;

    Ok(Json(table))
}

/// Creates a table
///
/// # Errors
///
/// - `400 Bad Request`: table number or guest capacity missing
/// - `500 Internal Server Error`: store failure
pub async fn create_table(
    State(state): State<AppState>,
    Json(req): Json<CreateTable>,
) -> ApiResult<Json<CreateTableResponse>> {
    req.validate()?;

    let table = Table::create(req);
    let table_id = state.store.tables.insert(&table).await?;

    Ok(Json(CreateTableResponse { table_id }))
}

/// Partially updates a table; returns the updated record
pub async fn update_table(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
    Json(req): Json<TablePatch>,
) -> ApiResult<Json<Table>> {
    let updated = state
        .store
        .tables
        .update(Filter::by("table_id", table_id.as_str()), &req)
        .await?;

    Ok(Json(updated))
}

/// User read endpoints
///
/// - `GET /users` - paginated listing
/// - `GET /user/:user_id` - single record
///
/// User records are always projected through `UserView`, which excludes
/// the password hash. There is no user update surface; token state moves
/// through the auth endpoints.
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
use mesa_shared::models::user::UserView;

/// Lists users as a paginated envelope
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paged<UserView>>> {
    let total_count = state.store.users.count(Filter::all()).await?;

    let (offset, limit) = page.window();
    let users = state
        .store
        .users
        .list_window(Filter::all(), offset, limit)
        .await?;

    Ok(Json(Paged {
        total_count,
        items: users.into_iter().map(UserView::from).collect(),
    }))
}

/// Fetches one user by external ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserView>> {
    let user = state
        .store
        .users
        .get(Filter::by("user_id", user_id.as_str()))
        .await?;

    Ok(Json(UserView::from(user)))
}

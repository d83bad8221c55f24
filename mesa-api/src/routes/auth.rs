/// Authentication endpoints
///
/// - `POST /user/signup` - create an account and receive a token pair
/// - `POST /user/login` - authenticate and receive a token pair
/// - `POST /user/refresh` - exchange a refresh token for a new pair
///
/// Each issued pair is persisted on the user record through the store
/// layer, overwriting the previous pair; the latest pair is the only
/// valid one.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use mesa_shared::{
    auth::{jwt, password},
    db::store::Filter,
    models::user::{CreateUser, TokenPatch, User, UserView},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 7, message = "phone must be at least 7 digits"))]
    pub phone: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Signup response
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    /// External ID of the created user
    pub user_id: String,

    /// Access token (24h)
    pub token: String,

    /// Refresh token (7d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub token: String,

    /// New refresh token (7d)
    pub refresh_token: String,
}

/// Registers a new user
///
/// Email and phone are checked independently for uniqueness; both checks
/// must come back empty before anything is written. The password is
/// hashed with Argon2id and the freshly issued token pair is embedded in
/// the record at insertion.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `409 Conflict`: email or phone already in use
/// - `500 Internal Server Error`: store or hashing failure
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<SignupResponse>> {
    req.validate()?;

    let email_taken = state
        .store
        .users
        .count(Filter::by("email", req.email.as_str()))
        .await?
        > 0;
    let phone_taken = state
        .store
        .users
        .count(Filter::by("phone", req.phone.as_str()))
        .await?
        > 0;
    if email_taken || phone_taken {
        return Err(ApiError::Conflict(
            "email or phone number already in use".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let mut user = User::create(CreateUser {
        name: req.name,
        email: req.email,
        phone: req.phone,
        password_hash,
    });

    let (token, refresh_token) =
        jwt::issue_pair(&user.user_id, &user.email, &user.name, state.jwt_secret())?;
    user.token = Some(token.clone());
    user.refresh_token = Some(refresh_token.clone());

    let user_id = state.store.users.insert(&user).await?;

    Ok(Json(SignupResponse {
        user_id,
        token,
        refresh_token,
    }))
}

/// Authenticates a user
///
/// Resolves the account by email and verifies the password; both failure
/// modes answer with the same generic message so the response does not
/// reveal which part was wrong. On success a fresh pair is issued and
/// persisted, and the updated record is returned without the password.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: unknown email or wrong password
/// - `500 Internal Server Error`: store or hashing failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<UserView>> {
    req.validate()?;

    let user = state
        .store
        .users
        .find(Filter::by("email", req.email.as_str()))
        .await?
        .ok_or_else(|| ApiError::Unauthorized("incorrect email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "incorrect email or password".to_string(),
        ));
    }

    let (token, refresh_token) =
        jwt::issue_pair(&user.user_id, &user.email, &user.name, state.jwt_secret())?;

    let updated = state
        .store
        .users
        .update(
            Filter::by("user_id", user.user_id.as_str()),
            &TokenPatch {
                token,
                refresh_token,
            },
        )
        .await?;

    Ok(Json(UserView::from(updated)))
}

/// Exchanges a refresh token for a new pair
///
/// # Errors
///
/// - `401 Unauthorized`: invalid, expired, or wrong-type token, or the
///   user no longer exists
/// - `500 Internal Server Error`: store failure
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = state
        .store
        .users
        .find(Filter::by("user_id", claims.sub.as_str()))
        .await?
        .ok_or_else(|| ApiError::Unauthorized("unknown user".to_string()))?;

    let (token, refresh_token) =
        jwt::issue_pair(&user.user_id, &user.email, &user.name, state.jwt_secret())?;

    state
        .store
        .users
        .update(
            Filter::by("user_id", user.user_id.as_str()),
            &TokenPatch {
                token: token.clone(),
                refresh_token: refresh_token.clone(),
            },
        )
        .await?;

    Ok(Json(RefreshResponse {
        token,
        refresh_token,
    }))
}

/// Bearer-token request gate for Axum
///
/// Write endpoints are guarded by this middleware: it extracts the
/// `Authorization: Bearer <token>` header, validates the access token,
/// and injects an [`AuthContext`] into request extensions before any
/// handler runs. Failures terminate the request with a JSON error body.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use mesa_shared::auth::middleware::bearer_auth;
///
/// let secret = "a-signing-secret-of-at-least-32-bytes!!".to_string();
/// let app: Router = Router::new()
///     .route("/menus", post(|| async { "created" }))
///     .layer(middleware::from_fn(move |req, next| {
///         bearer_auth(secret.clone(), req, next)
///     }));
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_access_token, JwtError};

/// Identity attached to the request after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// External ID of the authenticated user
    pub user_id: String,

    /// Email the presented token was issued for
    pub email: String,
}

impl AuthContext {
    pub fn from_claims(claims: &super::jwt::Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
        }
    }
}

/// Error type for the request gate
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Header present but not a Bearer token
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(json!({ "error": "unauthorized", "message": message }));
        (status, body).into_response()
    }
}

/// Bearer authentication middleware
///
/// # Errors
///
/// - 401 if the header is missing, the token is invalid or expired, or a
///   refresh token is presented in place of an access token
/// - 400 if the header is not in `Bearer <token>` form
pub async fn bearer_auth(secret: String, mut req: Request, next: Next) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("token expired".to_string()),
        JwtError::WrongType { .. } => AuthError::InvalidToken("not an access token".to_string()),
        _ => AuthError::InvalidToken(format!("invalid token: {}", e)),
    })?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}

/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user's identity claims
/// (external user ID, email, display name). Two token types exist with
/// distinct lifetimes:
///
/// - **Access token**: 24 hours, sent as `Authorization: Bearer` on writes
/// - **Refresh token**: 7 days, exchanged for a fresh pair
///
/// The signing secret is process-wide configuration (`JWT_SECRET`); this
/// module never owns key material.
///
/// # Example
///
/// ```
/// use mesa_shared::auth::jwt::{issue_pair, validate_access_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-signing-secret-of-at-least-32-bytes!!";
/// let (access, _refresh) = issue_pair("a1b2c3", "ana@example.com", "Ana", secret)?;
///
/// let claims = validate_access_token(&access, secret)?;
/// assert_eq!(claims.sub, "a1b2c3");
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "mesa";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("token has expired")]
    Expired,

    /// A token of the other type was presented
    #[error("wrong token type: expected {expected}")]
    WrongType { expected: &'static str },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token used to authorize write requests
    Access,

    /// Long-lived token used to obtain a new pair
    Refresh,
}

impl TokenType {
    /// Default expiration for this token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims
///
/// Standard claims (`iss`, `iat`, `exp`, `nbf`) plus the identity the
/// token is bound to: the user's external ID in `sub`, with email and
/// display name carried alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's external ID
    pub sub: String,

    /// Email address the token was issued for
    pub email: String,

    /// Display name
    pub name: String,

    /// Issuer - always "mesa"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Access or refresh
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims with the default expiration for `token_type`
    pub fn new(user_id: &str, email: &str, name: &str, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, email, name, token_type, token_type.default_expiration())
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: &str,
        email: &str,
        name: &str,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    /// Whether the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs a token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, expiration, `nbf`, and issuer.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks that it is an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongType { expected: "access" });
    }

    Ok(claims)
}

/// Validates a token and checks that it is a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongType { expected: "refresh" });
    }

    Ok(claims)
}

/// Issues an access/refresh token pair for one identity
///
/// Both tokens carry the same claims apart from type and lifetime. The
/// caller is responsible for persisting the pair on the user record: the
/// latest persisted pair is the only valid one, there is no revocation
/// list.
pub fn issue_pair(
    user_id: &str,
    email: &str,
    name: &str,
    secret: &str,
) -> Result<(String, String), JwtError> {
    let access = create_token(&Claims::new(user_id, email, name, TokenType::Access), secret)?;
    let refresh = create_token(&Claims::new(user_id, email, name, TokenType::Refresh), secret)?;

    Ok((access, refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(7));
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("abc123", "ana@example.com", "Ana", TokenType::Access);

        assert_eq!(claims.sub, "abc123");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.iss, "mesa");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new("abc123", "ana@example.com", "Ana", TokenType::Access);
        let token = create_token(&claims, SECRET).expect("should create token");

        let validated = validate_token(&token, SECRET).expect("should validate token");
        assert_eq!(validated.sub, "abc123");
        assert_eq!(validated.name, "Ana");
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new("abc123", "a@b.c", "A", TokenType::Access);
        let token = create_token(&claims, SECRET).expect("should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            "abc123",
            "a@b.c",
            "A",
            TokenType::Access,
            Duration::seconds(-3600),
        );
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_type_confusion_rejected() {
        let (access, refresh) =
            issue_pair("abc123", "ana@example.com", "Ana", SECRET).expect("should issue pair");

        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());

        // Cross-validation must fail
        assert!(matches!(
            validate_access_token(&refresh, SECRET),
            Err(JwtError::WrongType { expected: "access" })
        ));
        assert!(matches!(
            validate_refresh_token(&access, SECRET),
            Err(JwtError::WrongType { expected: "refresh" })
        ));
    }

    #[test]
    fn test_issue_pair_binds_identity() {
        let (access, refresh) =
            issue_pair("abc123", "ana@example.com", "Ana", SECRET).expect("should issue pair");

        let access_claims = validate_access_token(&access, SECRET).unwrap();
        let refresh_claims = validate_refresh_token(&refresh, SECRET).unwrap();

        assert_eq!(access_claims.sub, refresh_claims.sub);
        assert_eq!(access_claims.email, refresh_claims.email);
        assert!(refresh_claims.exp > access_claims.exp);
    }
}

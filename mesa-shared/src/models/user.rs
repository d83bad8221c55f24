/// User model
///
/// Users authenticate with email + password and hold the most recently
/// issued token pair on their record; issuing a new pair overwrites the
/// old one. The password field is an Argon2id hash, never plaintext, and
/// is excluded from every response through [`UserView`].
///
/// # Document shape
///
/// ```json
/// {
///   "user_id": "9f8a72c1e4b0...",
///   "name": "Ana",
///   "email": "ana@example.com",
///   "phone": "5551234567",
///   "password": "$argon2id$...",
///   "token": "eyJ...",
///   "refresh_token": "eyJ...",
///   "created_at": "...",
///   "updated_at": "..."
/// }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// External ID, derived once at creation
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Email address; uniqueness is checked at signup
    pub email: String,

    /// Phone number; uniqueness is checked at signup
    pub phone: String,

    /// Argon2id password hash
    pub password: String,

    /// Most recently issued access token
    pub token: Option<String>,

    /// Most recently issued refresh token
    pub refresh_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn external_id(&self) -> &str {
        &self.user_id
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

impl User {
    /// Builds a new user with a fresh identifier and timestamps
    ///
    /// The token pair is filled in by the signup flow before insertion.
    pub fn create(data: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            user_id: super::external_id(Uuid::new_v4()),
            name: data.name,
            email: data.email,
            phone: data.phone,
            password: data.password_hash,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patch persisting a freshly issued token pair on the user record
///
/// Written through the store layer after login and refresh; the previous
/// pair is overwritten.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPatch {
    pub token: String,
    pub refresh_token: String,
}

/// User record as returned to clients: everything except the password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            token: user.token,
            refresh_token: user.refresh_token,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreateUser {
        CreateUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5551234567".to_string(),
            password_hash: "$argon2id$test".to_string(),
        }
    }

    #[test]
    fn test_create_stamps_identity_and_timestamps() {
        let user = User::create(sample());

        assert_eq!(user.user_id.len(), 32);
        assert_eq!(user.created_at, user.updated_at);
        assert!(user.token.is_none());
        assert!(user.refresh_token.is_none());
    }

    #[test]
    fn test_view_excludes_password() {
        let user = User::create(sample());
        let view = UserView::from(user.clone());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["user_id"], serde_json::json!(user.user_id));
    }
}

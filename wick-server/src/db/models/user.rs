//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Saved shipping address on a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    /// Argon2 hash, never serialized into responses
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Partial profile update; addresses are replaced wholesale when present
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub addresses: Option<Vec<Address>>,
}

/// Auth response returned by register/login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub profile_image: Option<String>,
    pub token: String,
}

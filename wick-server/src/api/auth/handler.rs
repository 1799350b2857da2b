//! Auth API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use validator::Validate;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::{
    Address, AuthResponse, LoginInput, ProfileUpdate, RegisterInput, User,
};
use crate::db::repository::UserRepository;
use crate::db::repository::user::NewUser;
use crate::utils::{AppError, AppResult};

/// Profile payload: the user document minus the password hash
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub addresses: Vec<Address>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_string()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            profile_image: user.profile_image,
            phone_number: user.phone_number,
            addresses: user.addresses,
        }
    }
}

fn auth_response(state: &ServerState, user: User) -> AppResult<AuthResponse> {
    let id = user
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("User record has no id"))?;
    let token = state
        .jwt_service
        .generate_token(&id, &user.name, user.is_admin)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    Ok(AuthResponse {
        id,
        name: user.name,
        email: user.email,
        is_admin: user.is_admin,
        profile_image: user.profile_image,
        token,
    })
}

/// POST /api/auth/register - 注册新用户
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.db.clone());
    let password_hash = hash_password(&payload.password)?;
    let user = repo
        .create(NewUser {
            name: payload.name,
            email: payload.email.to_lowercase(),
            password_hash,
            is_admin: false,
        })
        .await
        .map_err(AppError::from)?;

    tracing::info!(user = %user.email, "User registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

/// POST /api/auth/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&payload.email.to_lowercase())
        .await
        .map_err(AppError::from)?;

    // Same answer for unknown email and wrong password
    let user = match user {
        Some(user) if verify_password(&payload.password, &user.password) => user,
        _ => return Err(AppError::invalid_credentials()),
    };

    Ok(Json(auth_response(&state, user)?))
}

/// GET /api/auth/profile - 当前用户资料
pub async fn get_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ProfileResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&user.id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(ProfileResponse::from(user)))
}

/// PUT /api/auth/profile - 更新当前用户资料
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<ProfileResponse>> {
    let repo = UserRepository::new(state.db.clone());

    let password_hash = match payload.password.as_deref() {
        Some(plain) if !plain.is_empty() => Some(hash_password(plain)?),
        _ => None,
    };

    let updated = repo
        .update_profile(
            &user.id,
            payload.name,
            payload.email.map(|e| e.to_lowercase()),
            password_hash,
            payload.profile_image,
            payload.phone_number,
            payload.addresses,
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(ProfileResponse::from(updated)))
}

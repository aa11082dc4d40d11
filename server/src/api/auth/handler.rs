//! Auth API Handlers
//!
//! Faculty signup/login by phone, admin signup/login by email. Every
//! successful call returns a bearer token plus the caller identity.

use axum::{Json, extract::State};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AdminLoginRequest, AdminSignupRequest, CallerInfo, LoginResponse, SignupRequest,
    UserLoginRequest, UserPublic,
};

use crate::auth::{ROLE_ADMIN, ROLE_USER};
use crate::core::ServerState;
use crate::db::repository::{AdminRepository, UserRepository};
use crate::security_log;

/// POST /api/auth/user/signup - register a faculty account
pub async fn user_signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(payload)
        .await
        .map_err(|e| e.into_app(ErrorCode::UserNotFound))?;

    let id = user.id.clone().unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&id, &user.name, ROLE_USER)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(user_id = %id, "Faculty account created");
    Ok(Json(LoginResponse {
        token,
        user: CallerInfo {
            id,
            name: user.name,
            role: ROLE_USER.to_string(),
        },
    }))
}

/// POST /api/auth/user/login - faculty login by phone + password
pub async fn user_login(
    State(state): State<ServerState>,
    Json(payload): Json<UserLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .authenticate(&payload.phone, &payload.password)
        .await
        .map_err(|e| {
            security_log!("WARN", "user_login_failed", phone = payload.phone.clone());
            e.into_app(ErrorCode::UserNotFound)
        })?;

    let id = user.id.clone().unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&id, &user.name, ROLE_USER)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: CallerInfo {
            id,
            name: user.name,
            role: ROLE_USER.to_string(),
        },
    }))
}

/// POST /api/auth/admin/signup - register an admin account
///
/// Registration closes once two admin accounts exist.
pub async fn admin_signup(
    State(state): State<ServerState>,
    Json(payload): Json<AdminSignupRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = AdminRepository::new(state.get_db());
    let admin = repo
        .create(payload)
        .await
        .map_err(|e| e.into_app(ErrorCode::UserNotFound))?;

    let id = admin.id.clone().unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&id, &admin.name, ROLE_ADMIN)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    security_log!("INFO", "admin_created", admin_id = id.clone());
    Ok(Json(LoginResponse {
        token,
        user: CallerInfo {
            id,
            name: admin.name,
            role: ROLE_ADMIN.to_string(),
        },
    }))
}

/// POST /api/auth/admin/login - admin login by email + password
pub async fn admin_login(
    State(state): State<ServerState>,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = AdminRepository::new(state.get_db());
    let admin = repo
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            security_log!("WARN", "admin_login_failed", email = payload.email.clone());
            e.into_app(ErrorCode::UserNotFound)
        })?;

    let id = admin.id.clone().unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&id, &admin.name, ROLE_ADMIN)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: CallerInfo {
            id,
            name: admin.name,
            role: ROLE_ADMIN.to_string(),
        },
    }))
}

/// GET /api/auth/users/all - list faculty accounts (admin)
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<UserPublic>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo
        .find_all()
        .await
        .map_err(|e| e.into_app(ErrorCode::UserNotFound))?;
    Ok(Json(
        users.into_iter().map(|u| u.into_public()).collect(),
    ))
}

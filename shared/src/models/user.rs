//! User / Admin payloads
//!
//! Public shapes only. Password hashes never leave the server crate's
//! repository layer; these types are what goes over the wire.

use serde::{Deserialize, Serialize};

/// Faculty user, public projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Faculty signup payload (phone + password)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub room_number: Option<String>,
}

/// Faculty login payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginRequest {
    pub phone: String,
    pub password: String,
}

/// Admin signup payload (registration is capped at two accounts)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Admin login payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// Token + caller identity returned by every login/signup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: CallerInfo,
}

/// Caller identity embedded in a [`LoginResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerInfo {
    pub id: String,
    pub name: String,
    /// "admin" or "user"
    pub role: String,
}

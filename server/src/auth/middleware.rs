//! Authentication middleware
//!
//! Axum middleware for JWT authentication and the admin role gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Whether a request may pass without a token.
///
/// Menu browsing, the specials feed, image serving, health and the
/// signup/login endpoints are public; everything else under `/api/`
/// needs a bearer token.
fn is_public(method: &http::Method, path: &str) -> bool {
    if !path.starts_with("/api/") {
        return true;
    }
    if path.starts_with("/api/auth/") {
        return matches!(
            path,
            "/api/auth/user/signup"
                | "/api/auth/user/login"
                | "/api/auth/admin/signup"
                | "/api/auth/admin/login"
        );
    }
    if path.starts_with("/api/image/") {
        return true;
    }
    // Catalog reads are open to unauthenticated browsing
    if method == http::Method::GET && path.starts_with("/api/menu") {
        return true;
    }
    false
}

/// Authentication middleware.
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`
/// and injects [`CurrentUser`] into the request extensions. Public
/// paths and CORS preflight pass through untouched.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin gate: requires `CurrentUser.role == "admin"`.
///
/// Non-admin callers get 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            user_role = user.role.clone()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        let get = http::Method::GET;
        let post = http::Method::POST;

        assert!(is_public(&get, "/health"));
        assert!(is_public(&get, "/api/menu"));
        assert!(is_public(&get, "/api/menu/specials"));
        assert!(is_public(&get, "/api/image/abc.jpg"));
        assert!(is_public(&post, "/api/auth/user/login"));
        assert!(is_public(&post, "/api/auth/admin/signup"));

        assert!(!is_public(&post, "/api/menu"));
        assert!(!is_public(&post, "/api/orders"));
        assert!(!is_public(&get, "/api/orders/recent"));
        assert!(!is_public(&get, "/api/auth/users/all"));
    }
}

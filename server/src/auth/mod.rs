//! Authentication module
//!
//! JWT authentication and the role gates:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - authenticated caller context
//! - [`require_auth`] - authentication middleware
//! - [`require_admin`] - admin role gate

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, ROLE_ADMIN, ROLE_USER};
pub use middleware::{require_admin, require_auth};

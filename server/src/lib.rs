//! Canteen Server - polytechnic canteen ordering backend
//!
//! # Overview
//!
//! - **HTTP API** (`api`): menu catalog, orders, auth, images, health
//! - **Authentication** (`auth`): JWT + Argon2, user/admin roles
//! - **Database** (`db`): embedded SurrealDB storage
//! - **Core** (`core`): configuration, state, server bootstrap
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, error, server
//! ├── auth/          # JWT service, middleware, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer and repositories
//! └── utils/         # logging, time helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::{init_logger, init_logger_with_file};

// Security logging macro - structured tracing with a fixed target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Set up the process environment: dotenv, then logging (file output
/// when `<WORK_DIR>/logs` exists)
pub fn setup_environment() -> std::io::Result<()> {
    let _ = dotenv::dotenv();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    let log_level = std::env::var("LOG_LEVEL").ok();

    if log_dir.exists() {
        utils::init_logger_with_file(log_level.as_deref(), log_dir.to_str());
    } else {
        utils::init_logger_with_file(log_level.as_deref(), None);
    }

    Ok(())
}

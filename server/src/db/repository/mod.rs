//! Repository Module
//!
//! CRUD and aggregation queries over the embedded SurrealDB tables.
//! Repositories return [`RepoError`]; the API layer converts to
//! [`shared::error::AppError`] via [`RepoError::into_app`] so domain
//! codes (404 vs 400 vs 500) survive the boundary.

pub mod menu_item;
pub mod order;
pub mod user;

pub use menu_item::{MenuFilter, MenuItemRepository};
pub use order::{OrderFilter, OrderRepository, OrderStats};
pub use user::{AdminRepository, UserRepository};

use shared::error::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Carries a fully-formed domain error through the repo layer
    #[error(transparent)]
    Domain(#[from] AppError),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    /// Convert into the API-facing error, defaulting the not-found code
    /// to the given domain code (e.g. [`ErrorCode::OrderNotFound`])
    pub fn into_app(self, not_found: ErrorCode) -> AppError {
        match self {
            RepoError::NotFound(msg) => AppError::with_message(not_found, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Domain(err) => err,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Current time as Unix millis
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh record key
pub(crate) fn new_record_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Strip a `table:` prefix if the caller passed a full record id
pub(crate) fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_handles_both_forms() {
        assert_eq!(strip_table_prefix("order", "order:abc"), "abc");
        assert_eq!(strip_table_prefix("order", "abc"), "abc");
        assert_eq!(strip_table_prefix("order", "menu_item:abc"), "menu_item:abc");
    }

    #[test]
    fn repo_error_maps_to_domain_code() {
        let err = RepoError::NotFound("Order x not found".into());
        let app = err.into_app(ErrorCode::OrderNotFound);
        assert_eq!(app.code, ErrorCode::OrderNotFound);

        let err = RepoError::Database("boom".into());
        let app = err.into_app(ErrorCode::OrderNotFound);
        assert_eq!(app.code, ErrorCode::DatabaseError);
    }
}

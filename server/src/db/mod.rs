//! Database Module
//!
//! Embedded SurrealDB storage. The schemaless store holds four tables:
//! `menu_item`, `order` (lines embedded), `user`, and `admin`.

pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::error::{Result, ServerError};

const NAMESPACE: &str = "canteen";
const DATABASE: &str = "canteen";

/// Open the on-disk database under the working directory
pub async fn open(path: &Path) -> Result<Surreal<Db>> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| ServerError::Database(format!("failed to open database: {}", e)))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| ServerError::Database(format!("failed to select database: {}", e)))?;

    tracing::info!(path = %path.display(), "Database opened");
    Ok(db)
}

/// Open an in-memory database, for tests
pub async fn open_in_memory() -> Result<Surreal<Db>> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| ServerError::Database(format!("failed to open in-memory database: {}", e)))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| ServerError::Database(format!("failed to select database: {}", e)))?;
    Ok(db)
}

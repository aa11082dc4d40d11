//! Server state
//!
//! Shared handle passed to every handler: configuration, the embedded
//! database, and the JWT service. Cloning is shallow.

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::error::{Result, ServerError};
use crate::core::Config;
use crate::db;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT service (shared ownership)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize the full server state: create the working directory,
    /// open the database, and build the JWT service.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| ServerError::Config(format!("cannot create work dir: {}", e)))?;
        std::fs::create_dir_all(work_dir.join("images/menu-images"))
            .map_err(|e| ServerError::Config(format!("cannot create images dir: {}", e)))?;

        let db = db::open(&work_dir.join("canteen.db")).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
        })
    }

    /// State backed by an in-memory database, for tests
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db = db::open_in_memory().await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
        })
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Working directory as a path
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Directory holding uploaded menu images
    pub fn images_dir(&self) -> PathBuf {
        self.work_dir().join("images/menu-images")
    }
}

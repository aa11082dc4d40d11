//! Bootstrap-level errors
//!
//! Handlers use [`shared::error::AppError`]; this type only covers
//! failures before the router is serving (config, database open, bind).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

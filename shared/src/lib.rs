//! Shared types for the canteen ordering system
//!
//! Domain models, request/response payloads, and the unified error
//! system used by the server crate. This crate does no I/O: the order
//! status state machine and the special-offer pricing computation live
//! here as pure functions so they can be unit tested in isolation.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};

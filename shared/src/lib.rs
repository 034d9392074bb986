//! Shared types for the marketplace admin console
//!
//! Backend record models, request payloads and the unified error
//! system used by both the backend client and the console service.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use models::Record;
pub use serde::{Deserialize, Serialize};

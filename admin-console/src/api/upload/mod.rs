//! Image upload API

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::state::AppState;

pub use handler::{ALLOWED_BUCKETS, UploadResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/uploads/{bucket}", post(handler::upload))
        // The handler enforces the configured limit while streaming
        .layer(DefaultBodyLimit::disable())
}

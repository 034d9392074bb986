//! Public landing page, login page stub and the catch-all 404

use axum::{Json, Router, http::Uri, routing::get};
use shared::error::{AppError, ErrorCode};

use crate::auth::LOGIN_PATH;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route(LOGIN_PATH, get(login_page))
}

/// GET / - where non-administrators end up
pub async fn landing() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "admin-console",
        "message": "Marketplace administration. Sign in with an administrator account to continue.",
        "login": LOGIN_PATH,
    }))
}

/// GET /admin/login - tells API clients where to post credentials
pub async fn login_page() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "login": "/admin/api/login",
        "method": "POST",
        "fields": ["email", "password"],
    }))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::with_message(ErrorCode::NotFound, format!("No route for {}", uri.path()))
        .with_detail("path", uri.path())
}

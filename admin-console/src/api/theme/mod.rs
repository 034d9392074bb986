//! App theme API (single row)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/api/theme", get(handler::get_theme).put(handler::update_theme))
}

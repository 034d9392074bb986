//! Admin settings API (key/value)

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/settings", get(handler::list).put(handler::upsert))
        .route("/admin/api/settings/{key}", delete(handler::remove))
}

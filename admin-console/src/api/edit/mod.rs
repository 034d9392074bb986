//! Combined edit screen for service listings and private theaters

mod handler;
mod target;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub use target::{EditKind, EditResult, EditTarget};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/edit", post(handler::submit))
        .route("/admin/api/edit/validate", post(handler::validate))
        .route("/admin/api/edit/{kind}/{id}", get(handler::load))
}

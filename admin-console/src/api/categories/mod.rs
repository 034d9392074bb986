//! Category API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/categories", get(handler::list).post(handler::create))
        .route(
            "/admin/api/categories/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/admin/api/categories/{id}/active", put(handler::set_active))
}

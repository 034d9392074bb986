//! Theater screen API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/theaters/{id}/screens", get(handler::list_for_theater))
        .route("/admin/api/screens", post(handler::create))
        .route(
            "/admin/api/screens/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/admin/api/screens/{id}/active", put(handler::set_active))
}

//! Private theater API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub use handler::TheaterDetail;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/theaters", get(handler::list).post(handler::create))
        .route(
            "/admin/api/theaters/{id}",
            get(handler::detail)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/admin/api/theaters/{id}/approval", put(handler::set_approval))
        .route("/admin/api/theaters/{id}/active", put(handler::set_active))
}

//! Service listing API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub use handler::ListingRow;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/services", get(handler::list).post(handler::create))
        .route(
            "/admin/api/services/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/admin/api/services/{id}/approval", put(handler::set_approval))
        .route("/admin/api/services/{id}/active", put(handler::set_active))
}

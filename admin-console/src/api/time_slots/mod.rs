//! Time slot API, including the price preview

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub use handler::SlotPricePreview;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/screens/{id}/time-slots", get(handler::list_for_screen))
        .route("/admin/api/time-slots", post(handler::create))
        .route(
            "/admin/api/time-slots/{id}",
            put(handler::update).delete(handler::delete),
        )
        .route("/admin/api/time-slots/{id}/availability", put(handler::set_availability))
        .route("/admin/api/time-slots/{id}/price", get(handler::price_preview))
}

//! Dashboard API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub use handler::{DashboardView, RECENT_BOOKINGS};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/api/dashboard", get(handler::overview))
}

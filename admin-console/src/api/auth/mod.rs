//! Sign-in API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;

pub use handler::{LoginRequest, LoginResponse, SessionInfo};

pub fn router(state: &AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/admin/api/login", post(handler::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    Router::new()
        .merge(login)
        .route("/admin/api/logout", post(handler::logout))
        .route("/admin/api/session", get(handler::session))
}

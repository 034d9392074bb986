//! HTTP API for the admin console
//!
//! Every screen lives in its own module with a `router()`; everything
//! under `/admin` except the sign-in endpoints sits behind the admin guard.

pub mod auth;
pub mod categories;
pub mod crud;
pub mod dashboard;
pub mod edit;
pub mod health;
pub mod public;
pub mod screens;
pub mod services;
pub mod settings;
pub mod theaters;
pub mod theme;
pub mod time_slots;
pub mod upload;
pub mod vendors;

use axum::routing::any;
use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue};
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_admin;
use crate::middleware::logging_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Screens that require an administrator
fn admin_router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(vendors::router())
        .merge(services::router())
        .merge(edit::router())
        .merge(theaters::router())
        .merge(screens::router())
        .merge(time_slots::router())
        .merge(categories::router())
        .merge(theme::router())
        .merge(settings::router())
        .merge(upload::router())
        // Unknown admin paths are still guarded
        .route("/admin", any(public::not_found))
        .route("/admin/{*rest}", any(public::not_found))
}

/// All routes with the admin guard applied (no outer middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    let guarded = admin_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_admin,
    ));

    Router::new()
        .merge(guarded)
        .merge(auth::router(state))
        .merge(public::router())
        .merge(health::router())
        .fallback(public::not_found)
}

/// Fully configured application with middleware and state
pub fn build_app(state: AppState) -> Router {
    build_router(&state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // Request logging
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}

//! Vendor API: list, detail, verification and document review

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub use handler::VendorDetail;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/vendors", get(handler::list))
        .route("/admin/api/vendors/{id}", get(handler::detail))
        .route("/admin/api/vendors/{id}/verification", put(handler::set_verification))
        .route("/admin/api/vendors/{id}/active", put(handler::set_active))
        .route(
            "/admin/api/vendor-documents/{id}/status",
            put(handler::set_document_status),
        )
}

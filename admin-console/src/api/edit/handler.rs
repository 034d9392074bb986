//! Edit screen handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{PrivateTheater, ServiceListing};
use uuid::Uuid;

use super::target::{EditKind, EditResult, EditTarget};
use crate::api::ApiResult;
use crate::state::AppState;

/// GET /admin/api/edit/{kind}/{id} - the form prefilled from the stored row
pub async fn load(
    State(state): State<AppState>,
    Path((kind, id)): Path<(EditKind, Uuid)>,
) -> ApiResult<EditTarget> {
    let target = match kind {
        EditKind::ServiceListing => {
            EditTarget::from(&state.table::<ServiceListing>().get(id).await?)
        }
        EditKind::PrivateTheater => {
            EditTarget::from(&state.table::<PrivateTheater>().get(id).await?)
        }
    };
    Ok(Json(target))
}

/// POST /admin/api/edit/validate - check the form without saving
pub async fn validate(Json(target): Json<EditTarget>) -> ApiResult<serde_json::Value> {
    target.validate()?;
    Ok(Json(serde_json::json!({ "valid": true, "kind": target.kind() })))
}

/// POST /admin/api/edit
pub async fn submit(
    State(state): State<AppState>,
    Json(target): Json<EditTarget>,
) -> ApiResult<EditResult> {
    let kind = target.kind();
    let result = target.submit(&state).await?;
    tracing::debug!(?kind, "Edit form saved");
    Ok(Json(result))
}

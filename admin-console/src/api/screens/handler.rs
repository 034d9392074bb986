//! Theater screen handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ActiveToggle, TheaterScreen, TheaterScreenDraft, VersionedUpdate};
use uuid::Uuid;

use crate::api::{ApiResult, crud};
use crate::state::AppState;

/// GET /admin/api/theaters/{id}/screens
pub async fn list_for_theater(
    State(state): State<AppState>,
    Path(theater_id): Path<Uuid>,
) -> ApiResult<Vec<TheaterScreen>> {
    let query = baas_client::Query::new()
        .eq("theater_id", theater_id.to_string())
        .order("screen_number", true);
    Ok(Json(state.table::<TheaterScreen>().list_where(query).await?))
}

/// GET /admin/api/screens/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<TheaterScreen> {
    Ok(Json(state.table::<TheaterScreen>().get(id).await?))
}

/// POST /admin/api/screens
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TheaterScreenDraft>,
) -> ApiResult<TheaterScreen> {
    Ok(Json(crud::create(&state, &draft).await?))
}

/// PUT /admin/api/screens/{id} - full row, conditional on `version`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VersionedUpdate<TheaterScreenDraft>>,
) -> ApiResult<TheaterScreen> {
    Ok(Json(
        crud::update_versioned(&state, id, payload.version, &payload.data).await?,
    ))
}

/// PUT /admin/api/screens/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<ActiveToggle>,
) -> ApiResult<TheaterScreen> {
    Ok(Json(crud::patch(&state, id, &toggle).await?))
}

/// DELETE /admin/api/screens/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    Ok(Json(crud::delete::<TheaterScreen>(&state, id).await?))
}

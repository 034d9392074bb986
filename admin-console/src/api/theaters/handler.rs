//! Private theater handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use serde_json::json;
use shared::models::{
    ActiveToggle, ApprovalStatus, PrivateTheater, PrivateTheaterDraft, StatusChange,
    TheaterScreen, TheaterTimeSlot, VersionedUpdate,
};
use uuid::Uuid;

use crate::api::{ApiResult, crud};
use crate::listing::{ListParams, narrow};
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

/// GET /admin/api/theaters?search=&status=&sort=&dir=
///
/// Search matches name or city.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams<ApprovalStatus>>,
) -> ApiResult<Vec<PrivateTheater>> {
    let mut query = baas_client::Query::new().order("created_at", false);
    if let Some(status) = params.status {
        query = query.eq("approval_status", status.as_str());
    }
    let theaters = state.table::<PrivateTheater>().list_where(query).await?;
    Ok(Json(narrow(theaters, &params, |t| {
        vec![Some(t.name.as_str()), t.city.as_deref()]
    })))
}

#[derive(Debug, Serialize)]
pub struct TheaterDetail {
    pub theater: PrivateTheater,
    pub screens: Vec<TheaterScreen>,
    pub time_slots: Vec<TheaterTimeSlot>,
}

/// GET /admin/api/theaters/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<TheaterDetail> {
    let theater = state.table::<PrivateTheater>().get(id).await?;
    let by_theater = || baas_client::Query::new().eq("theater_id", id.to_string());
    let screens = state
        .table::<TheaterScreen>()
        .list_where(by_theater().order("screen_number", true))
        .await?;
    let time_slots = state
        .table::<TheaterTimeSlot>()
        .list_where(by_theater().order("start_time", true))
        .await?;
    Ok(Json(TheaterDetail {
        theater,
        screens,
        time_slots,
    }))
}

/// POST /admin/api/theaters
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<PrivateTheaterDraft>,
) -> ApiResult<PrivateTheater> {
    Ok(Json(crud::create(&state, &draft).await?))
}

/// PUT /admin/api/theaters/{id} - full row, conditional on `version`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VersionedUpdate<PrivateTheaterDraft>>,
) -> ApiResult<PrivateTheater> {
    Ok(Json(
        crud::update_versioned(&state, id, payload.version, &payload.data).await?,
    ))
}

/// PUT /admin/api/theaters/{id}/approval
pub async fn set_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<ApprovalStatus>>,
) -> ApiResult<PrivateTheater> {
    validate_optional_text(&change.reason, "reason", MAX_NOTE_LEN)?;
    let theater: PrivateTheater =
        crud::patch(&state, id, &json!({ "approval_status": change.status })).await?;
    tracing::info!(
        theater_id = %id,
        status = %change.status,
        reason = ?change.reason,
        "Theater approval changed"
    );
    Ok(Json(theater))
}

/// PUT /admin/api/theaters/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<ActiveToggle>,
) -> ApiResult<PrivateTheater> {
    Ok(Json(crud::patch(&state, id, &toggle).await?))
}

/// DELETE /admin/api/theaters/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    Ok(Json(crud::delete::<PrivateTheater>(&state, id).await?))
}

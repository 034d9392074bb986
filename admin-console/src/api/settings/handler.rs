//! Admin settings handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{AdminSetting, Record, SettingUpsert};

use crate::api::ApiResult;
use crate::state::AppState;
use crate::validation::{Validate, validate_setting_key};

/// GET /admin/api/settings
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<AdminSetting>> {
    let query = baas_client::Query::new().order("setting_key", true);
    Ok(Json(state.table::<AdminSetting>().list_where(query).await?))
}

/// PUT /admin/api/settings - insert or replace by `setting_key`
pub async fn upsert(
    State(state): State<AppState>,
    Json(setting): Json<SettingUpsert>,
) -> ApiResult<AdminSetting> {
    setting.validate()?;
    let saved = state
        .table::<AdminSetting>()
        .upsert(&setting, "setting_key")
        .await?;
    tracing::info!(key = %saved.setting_key, "Setting saved");
    Ok(Json(saved))
}

/// DELETE /admin/api/settings/{key}
pub async fn remove(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<bool> {
    validate_setting_key(&key)?;
    let query = baas_client::Query::new().eq("setting_key", key.as_str());
    let removed = state.store.delete(AdminSetting::TABLE, &query).await?;
    if removed == 0 {
        return Err(AppError::with_message(
            ErrorCode::SettingNotFound,
            format!("Setting {key} not found"),
        ));
    }
    tracing::info!(key = %key, "Setting deleted");
    Ok(Json(true))
}

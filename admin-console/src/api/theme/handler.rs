//! App theme handlers

use axum::{Json, extract::State};
use shared::models::{AppThemeConfig, ThemeUpdate};

use crate::api::{ApiResult, crud};
use crate::state::AppState;
use crate::validation::Validate;

async fn current(state: &AppState) -> Result<Option<AppThemeConfig>, shared::AppError> {
    let query = baas_client::Query::new().order("updated_at", false).limit(1);
    let rows = state.table::<AppThemeConfig>().list_where(query).await?;
    Ok(rows.into_iter().next())
}

/// GET /admin/api/theme - `null` until a theme has been saved
pub async fn get_theme(State(state): State<AppState>) -> ApiResult<Option<AppThemeConfig>> {
    Ok(Json(current(&state).await?))
}

/// PUT /admin/api/theme - writes over the existing row or creates the first one
pub async fn update_theme(
    State(state): State<AppState>,
    Json(update): Json<ThemeUpdate>,
) -> ApiResult<AppThemeConfig> {
    update.validate()?;
    let saved: AppThemeConfig = match current(&state).await? {
        Some(existing) => crud::patch(&state, existing.id, &update).await?,
        None => state.table::<AppThemeConfig>().insert(&update).await?,
    };
    tracing::info!(theme_id = %saved.id, "Theme saved");
    Ok(Json(saved))
}

//! Category handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use shared::error::AppError;
use shared::models::{ActiveToggle, Category, CategoryDraft, Record};
use uuid::Uuid;

use crate::api::{ApiResult, crud};
use crate::listing::{ListParams, narrow};
use crate::state::AppState;
use crate::validation::Validate;

/// GET /admin/api/categories?search=&sort=&dir=
///
/// Search matches name or description. Default order is `sort_order`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Category>> {
    let query = baas_client::Query::new()
        .order("sort_order", true)
        .order("name", true);
    let categories = state.table::<Category>().list_where(query).await?;
    Ok(Json(narrow(categories, &params, |c| {
        vec![Some(c.name.as_str()), c.description.as_deref()]
    })))
}

/// GET /admin/api/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Category> {
    Ok(Json(state.table::<Category>().get(id).await?))
}

/// POST /admin/api/categories - appended after the last category unless `sort_order` is given
pub async fn create(
    State(state): State<AppState>,
    Json(mut draft): Json<CategoryDraft>,
) -> ApiResult<Category> {
    draft.validate()?;
    if draft.sort_order.is_none() {
        let last = baas_client::Query::new()
            .select("sort_order")
            .order("sort_order", false)
            .limit(1);
        let rows = state.store.select(Category::TABLE, &last).await?;
        let max = rows
            .first()
            .and_then(|r| r.get("sort_order"))
            .and_then(Value::as_i64)
            .unwrap_or(-1);
        draft.sort_order = Some(i32::try_from(max + 1).unwrap_or(i32::MAX));
    }
    Ok(Json(crud::create(&state, &draft).await?))
}

/// PUT /admin/api/categories/{id}
///
/// Categories carry no version column; the row is overwritten. A missing
/// `sort_order` keeps the current position.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<Category> {
    draft.validate()?;
    if draft.parent_id == Some(id) {
        return Err(AppError::validation("A category cannot be its own parent")
            .with_detail("field", "parent_id"));
    }
    let mut patch = serde_json::to_value(&draft)
        .map_err(|e| AppError::internal(format!("Category payload: {e}")))?;
    if let Value::Object(map) = &mut patch
        && map.get("sort_order").is_some_and(Value::is_null)
    {
        map.remove("sort_order");
    }
    Ok(Json(crud::patch(&state, id, &patch).await?))
}

/// PUT /admin/api/categories/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<ActiveToggle>,
) -> ApiResult<Category> {
    Ok(Json(crud::patch(&state, id, &toggle).await?))
}

/// DELETE /admin/api/categories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    Ok(Json(crud::delete::<Category>(&state, id).await?))
}

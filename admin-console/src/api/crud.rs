//! Validate-then-write helpers shared by the edit screens

use serde::Serialize;
use shared::error::AppError;
use shared::models::Record;
use uuid::Uuid;

use crate::state::AppState;
use crate::validation::Validate;

/// Validate a draft and insert it as a new row
pub async fn create<T, D>(state: &AppState, draft: &D) -> Result<T, AppError>
where
    T: Record,
    D: Validate + Serialize + Sync,
{
    draft.validate()?;
    let record: T = state.table::<T>().insert(draft).await?;
    tracing::info!(resource = T::RESOURCE, id = %record.id(), "Created");
    Ok(record)
}

/// Validate a draft and write it over the row read at `version`
pub async fn update_versioned<T, D>(
    state: &AppState,
    id: Uuid,
    version: i64,
    draft: &D,
) -> Result<T, AppError>
where
    T: Record,
    D: Validate + Serialize + Sync,
{
    draft.validate()?;
    let record = state.table::<T>().update_versioned(id, version, draft).await?;
    tracing::info!(resource = T::RESOURCE, id = %id, version, "Updated");
    Ok(record)
}

/// Change a single field (or a small set) on one row
pub async fn patch<T, P>(state: &AppState, id: Uuid, patch: &P) -> Result<T, AppError>
where
    T: Record,
    P: Serialize + Sync,
{
    let record = state.table::<T>().patch(id, patch).await?;
    tracing::info!(resource = T::RESOURCE, id = %id, "Patched");
    Ok(record)
}

pub async fn delete<T: Record>(state: &AppState, id: Uuid) -> Result<bool, AppError> {
    state.table::<T>().delete(id).await?;
    tracing::info!(resource = T::RESOURCE, id = %id, "Deleted");
    Ok(true)
}

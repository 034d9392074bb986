//! Edit form payloads
//!
//! The form is either a service listing or a private theater. `kind`
//! names the variant on the wire so each one is validated and submitted
//! against its own schema.

use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{PrivateTheater, PrivateTheaterDraft, ServiceListing, ServiceListingDraft};
use uuid::Uuid;

use crate::api::crud;
use crate::state::AppState;
use crate::validation::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    ServiceListing,
    PrivateTheater,
}

/// One submission of the edit form.
///
/// Without `id` the draft is created; with `id` it replaces the row read
/// at `version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditTarget {
    ServiceListing {
        id: Option<Uuid>,
        version: Option<i64>,
        data: ServiceListingDraft,
    },
    PrivateTheater {
        id: Option<Uuid>,
        version: Option<i64>,
        data: PrivateTheaterDraft,
    },
}

/// The saved record, tagged the same way as the form
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditResult {
    ServiceListing { record: ServiceListing },
    PrivateTheater { record: PrivateTheater },
}

impl From<&ServiceListing> for EditTarget {
    fn from(l: &ServiceListing) -> Self {
        EditTarget::ServiceListing {
            id: Some(l.id),
            version: Some(l.version),
            data: ServiceListingDraft::from(l),
        }
    }
}

impl From<&PrivateTheater> for EditTarget {
    fn from(t: &PrivateTheater) -> Self {
        EditTarget::PrivateTheater {
            id: Some(t.id),
            version: Some(t.version),
            data: PrivateTheaterDraft::from(t),
        }
    }
}

/// Existing rows need the version they were read at
fn version_for(id: Option<Uuid>, version: Option<i64>) -> Result<Option<(Uuid, i64)>, AppError> {
    match (id, version) {
        (None, _) => Ok(None),
        (Some(id), Some(v)) => Ok(Some((id, v))),
        (Some(_), None) => Err(AppError::required("version")),
    }
}

impl EditTarget {
    pub fn kind(&self) -> EditKind {
        match self {
            EditTarget::ServiceListing { .. } => EditKind::ServiceListing,
            EditTarget::PrivateTheater { .. } => EditKind::PrivateTheater,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            EditTarget::ServiceListing { id, version, data } => {
                version_for(*id, *version)?;
                data.validate()
            }
            EditTarget::PrivateTheater { id, version, data } => {
                version_for(*id, *version)?;
                data.validate()
            }
        }
    }

    /// Validate, then insert or run the versioned update
    pub async fn submit(self, state: &AppState) -> Result<EditResult, AppError> {
        match self {
            EditTarget::ServiceListing { id, version, data } => {
                let record = match version_for(id, version)? {
                    None => crud::create(state, &data).await?,
                    Some((id, v)) => crud::update_versioned(state, id, v, &data).await?,
                };
                Ok(EditResult::ServiceListing { record })
            }
            EditTarget::PrivateTheater { id, version, data } => {
                let record = match version_for(id, version)? {
                    None => crud::create(state, &data).await?,
                    Some((id, v)) => crud::update_versioned(state, id, v, &data).await?,
                };
                Ok(EditResult::PrivateTheater { record })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_discriminant_selects_schema() {
        let target: EditTarget = serde_json::from_value(json!({
            "kind": "private_theater",
            "data": {
                "vendor_id": null,
                "name": "Cinema Nook",
                "capacity": 10,
                "base_price": 1999
            }
        }))
        .unwrap();
        assert_eq!(target.kind(), EditKind::PrivateTheater);
        assert!(target.validate().is_ok());

        // Same payload under the other kind misses listing fields
        let err = serde_json::from_value::<EditTarget>(json!({
            "kind": "service_listing",
            "data": { "name": "Cinema Nook", "capacity": 10, "base_price": 1999 }
        }));
        assert!(err.is_err());

        assert!(serde_json::from_value::<EditTarget>(json!({"kind": "vendor", "data": {}})).is_err());
    }

    #[test]
    fn test_existing_row_needs_version() {
        let target: EditTarget = serde_json::from_value(json!({
            "kind": "private_theater",
            "id": Uuid::new_v4(),
            "data": { "vendor_id": null, "name": "Nook", "capacity": 4, "base_price": 900 }
        }))
        .unwrap();
        let err = target.validate().unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::RequiredField);
    }
}

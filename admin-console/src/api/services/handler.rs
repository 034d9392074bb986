//! Service listing handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use serde_json::json;
use shared::models::{
    ActiveToggle, ApprovalStatus, ServiceListing, ServiceListingDraft, StatusChange,
    VersionedUpdate,
};
use uuid::Uuid;

use crate::api::{ApiResult, crud};
use crate::listing::{ListParams, narrow};
use crate::pricing::PriceDisplay;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

/// A listing with its prices formatted for display
#[derive(Debug, Serialize)]
pub struct ListingRow {
    #[serde(flatten)]
    pub listing: ServiceListing,
    pub price: PriceDisplay,
}

impl ListingRow {
    fn new(listing: ServiceListing, currency: &str) -> Self {
        let price = PriceDisplay::new(listing.base_price, listing.discounted_price, currency);
        Self { listing, price }
    }
}

/// GET /admin/api/services?search=&status=&sort=&dir=
///
/// Search matches title or description.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams<ApprovalStatus>>,
) -> ApiResult<Vec<ListingRow>> {
    let mut query = baas_client::Query::new().order("created_at", false);
    if let Some(status) = params.status {
        query = query.eq("approval_status", status.as_str());
    }
    let listings = state.table::<ServiceListing>().list_where(query).await?;
    let rows = narrow(listings, &params, |l| {
        vec![Some(l.title.as_str()), l.description.as_deref()]
    });
    let currency = &state.config.currency;
    Ok(Json(
        rows.into_iter()
            .map(|l| ListingRow::new(l, currency))
            .collect(),
    ))
}

/// GET /admin/api/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ListingRow> {
    let listing = state.table::<ServiceListing>().get(id).await?;
    Ok(Json(ListingRow::new(listing, &state.config.currency)))
}

/// POST /admin/api/services
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ServiceListingDraft>,
) -> ApiResult<ServiceListing> {
    Ok(Json(crud::create(&state, &draft).await?))
}

/// PUT /admin/api/services/{id} - full row, conditional on `version`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VersionedUpdate<ServiceListingDraft>>,
) -> ApiResult<ServiceListing> {
    Ok(Json(
        crud::update_versioned(&state, id, payload.version, &payload.data).await?,
    ))
}

/// PUT /admin/api/services/{id}/approval
pub async fn set_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<ApprovalStatus>>,
) -> ApiResult<ServiceListing> {
    validate_optional_text(&change.reason, "reason", MAX_NOTE_LEN)?;
    let listing: ServiceListing =
        crud::patch(&state, id, &json!({ "approval_status": change.status })).await?;
    tracing::info!(
        listing_id = %id,
        status = %change.status,
        reason = ?change.reason,
        "Listing approval changed"
    );
    Ok(Json(listing))
}

/// PUT /admin/api/services/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<ActiveToggle>,
) -> ApiResult<ServiceListing> {
    Ok(Json(crud::patch(&state, id, &toggle).await?))
}

/// DELETE /admin/api/services/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    Ok(Json(crud::delete::<ServiceListing>(&state, id).await?))
}

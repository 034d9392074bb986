//! Vendor handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use serde_json::json;
use shared::error::AppError;
use shared::models::{
    ActiveToggle, DocumentStatus, ServiceListing, StatusChange, Vendor, VendorDocument,
    VerificationStatus, WalletBalance,
};
use uuid::Uuid;

use crate::api::{ApiResult, crud};
use crate::listing::{ListParams, narrow};
use crate::pricing::format_price;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Remote procedure returning a vendor's payout balances
const WALLET_PROCEDURE: &str = "get_vendor_wallet_balance";

/// GET /admin/api/vendors?search=&status=&sort=&dir=
///
/// Search matches business name or email.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams<VerificationStatus>>,
) -> ApiResult<Vec<Vendor>> {
    let mut query = baas_client::Query::new().order("created_at", false);
    if let Some(status) = params.status {
        query = query.eq("verification_status", status.as_str());
    }
    let vendors = state.table::<Vendor>().list_where(query).await?;
    Ok(Json(narrow(vendors, &params, |v| {
        vec![Some(v.business_name.as_str()), v.email.as_deref()]
    })))
}

#[derive(Debug, Serialize)]
pub struct WalletView {
    #[serde(flatten)]
    pub balance: WalletBalance,
    pub available_display: String,
    pub pending_display: String,
}

#[derive(Debug, Serialize)]
pub struct VendorDetail {
    pub vendor: Vendor,
    pub documents: Vec<VendorDocument>,
    pub listings: Vec<ServiceListing>,
    /// `None` when the balance procedure failed; the rest of the page still loads
    pub wallet: Option<WalletView>,
}

/// GET /admin/api/vendors/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<VendorDetail> {
    let vendor = state.table::<Vendor>().get(id).await?;
    let by_vendor = || baas_client::Query::new().eq("vendor_id", id.to_string());

    let documents = state
        .table::<VendorDocument>()
        .list_where(by_vendor().order("uploaded_at", false))
        .await?;
    let listings = state
        .table::<ServiceListing>()
        .list_where(by_vendor().order("created_at", false))
        .await?;

    let wallet = match state
        .rpc::<WalletBalance>(WALLET_PROCEDURE, json!({ "vendor_id": id }))
        .await
    {
        Ok(balance) => Some(WalletView {
            available_display: format_price(balance.available, &state.config.currency),
            pending_display: format_price(balance.pending, &state.config.currency),
            balance,
        }),
        Err(e) => {
            tracing::warn!(vendor_id = %id, code = %e.code, "Wallet balance unavailable");
            None
        }
    };

    Ok(Json(VendorDetail {
        vendor,
        documents,
        listings,
        wallet,
    }))
}

/// PUT /admin/api/vendors/{id}/verification
pub async fn set_verification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<VerificationStatus>>,
) -> ApiResult<Vendor> {
    validate_optional_text(&change.reason, "reason", MAX_NOTE_LEN)?;
    let vendor: Vendor =
        crud::patch(&state, id, &json!({ "verification_status": change.status })).await?;
    tracing::info!(
        vendor_id = %id,
        status = %change.status,
        reason = ?change.reason,
        "Vendor verification changed"
    );
    Ok(Json(vendor))
}

/// PUT /admin/api/vendors/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<ActiveToggle>,
) -> ApiResult<Vendor> {
    Ok(Json(crud::patch(&state, id, &toggle).await?))
}

/// PUT /admin/api/vendor-documents/{id}/status
///
/// A rejection must say why; any other status clears the old reason.
pub async fn set_document_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<DocumentStatus>>,
) -> ApiResult<VendorDocument> {
    let reason = change
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    let rejection_reason = match change.status {
        DocumentStatus::Rejected => {
            let reason = reason.ok_or_else(|| AppError::required("reason"))?;
            validate_optional_text(&Some(reason.to_string()), "reason", MAX_NOTE_LEN)?;
            Some(reason)
        }
        _ => None,
    };
    let doc: VendorDocument = crud::patch(
        &state,
        id,
        &json!({ "status": change.status, "rejection_reason": rejection_reason }),
    )
    .await?;
    Ok(Json(doc))
}

//! Dashboard handlers

use axum::{Json, extract::State};
use baas_client::Query;
use serde::Serialize;
use shared::models::{Booking, DashboardStats};

use crate::api::ApiResult;
use crate::pricing::format_price;
use crate::state::AppState;

/// Remote procedure computing the headline totals
const STATS_PROCEDURE: &str = "get_admin_dashboard_stats";

/// How many bookings the dashboard lists
pub const RECENT_BOOKINGS: usize = 10;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: Option<DashboardStats>,
    /// `total_revenue` formatted in the console currency
    pub revenue_display: Option<String>,
    pub recent_bookings: Vec<Booking>,
    /// One generic line per panel that failed to load
    pub warnings: Vec<String>,
}

/// GET /admin/api/dashboard
///
/// Each panel loads independently; a failing panel is logged and left empty.
pub async fn overview(State(state): State<AppState>) -> ApiResult<DashboardView> {
    let mut warnings = Vec::new();

    let stats = match state
        .rpc::<DashboardStats>(STATS_PROCEDURE, serde_json::json!({}))
        .await
    {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(code = %e.code, "Dashboard statistics unavailable");
            warnings.push("Statistics could not be loaded".to_string());
            None
        }
    };

    let recent = Query::new()
        .order("created_at", false)
        .limit(RECENT_BOOKINGS);
    let recent_bookings = match state.table::<Booking>().list_where(recent).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Recent bookings unavailable");
            warnings.push("Recent bookings could not be loaded".to_string());
            Vec::new()
        }
    };

    let revenue_display = stats
        .as_ref()
        .map(|s| format_price(s.total_revenue, &state.config.currency));

    Ok(Json(DashboardView {
        stats,
        revenue_display,
        recent_bookings,
        warnings,
    }))
}

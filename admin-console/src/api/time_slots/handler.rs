//! Time slot handlers
//!
//! Slots carry no version column, so edits overwrite the whole row.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::models::{AvailabilityToggle, SlotPriceQuote, TheaterTimeSlot, TimeSlotDraft};
use uuid::Uuid;

use crate::api::{ApiResult, crud};
use crate::pricing::{format_price, slot_display_price};
use crate::state::AppState;
use crate::validation::Validate;

/// Remote procedure that prices a slot on a given date
const PRICE_PROCEDURE: &str = "calculate_slot_price";

/// GET /admin/api/screens/{id}/time-slots
pub async fn list_for_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<Uuid>,
) -> ApiResult<Vec<TheaterTimeSlot>> {
    let query = baas_client::Query::new()
        .eq("screen_id", screen_id.to_string())
        .order("start_time", true);
    Ok(Json(state.table::<TheaterTimeSlot>().list_where(query).await?))
}

/// POST /admin/api/time-slots
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TimeSlotDraft>,
) -> ApiResult<TheaterTimeSlot> {
    Ok(Json(crud::create(&state, &draft).await?))
}

/// PUT /admin/api/time-slots/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<TimeSlotDraft>,
) -> ApiResult<TheaterTimeSlot> {
    draft.validate()?;
    Ok(Json(crud::patch(&state, id, &draft).await?))
}

/// PUT /admin/api/time-slots/{id}/availability
pub async fn set_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<AvailabilityToggle>,
) -> ApiResult<TheaterTimeSlot> {
    Ok(Json(crud::patch(&state, id, &toggle).await?))
}

/// DELETE /admin/api/time-slots/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    Ok(Json(crud::delete::<TheaterTimeSlot>(&state, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    /// Booking date to quote; without it only the local figures are shown
    pub date: Option<NaiveDate>,
}

/// What a slot costs on a normal day, a weekend and a holiday, plus the
/// backend quote for a specific date
#[derive(Debug, Serialize)]
pub struct SlotPricePreview {
    pub slot_id: Uuid,
    pub base: String,
    pub weekend: String,
    pub holiday: String,
    pub quote: Option<SlotPriceQuote>,
    pub quote_display: Option<String>,
}

/// GET /admin/api/time-slots/{id}/price?date=YYYY-MM-DD
///
/// The quote comes from the backend procedure and is authoritative; the
/// multiplier figures are display only.
pub async fn price_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PriceParams>,
) -> ApiResult<SlotPricePreview> {
    let slot = state.table::<TheaterTimeSlot>().get(id).await?;
    let currency = state.config.currency.as_str();

    let quote = match params.date {
        Some(date) => Some(
            state
                .rpc::<SlotPriceQuote>(
                    PRICE_PROCEDURE,
                    json!({ "slot_id": id, "booking_date": date }),
                )
                .await?,
        ),
        None => None,
    };

    Ok(Json(SlotPricePreview {
        slot_id: id,
        base: format_price(slot.base_price, currency),
        weekend: format_price(
            slot_display_price(slot.base_price, slot.weekend_multiplier)?,
            currency,
        ),
        holiday: format_price(
            slot_display_price(slot.base_price, slot.holiday_multiplier)?,
            currency,
        ),
        quote_display: quote.as_ref().map(|q| format_price(q.total_price, currency)),
        quote,
    }))
}

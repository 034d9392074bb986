//! Display-only price arithmetic
//!
//! Booking totals and payouts are computed by backend procedures; these
//! helpers only shape numbers for the screens.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};

/// Whole-percent discount of `discounted` against `base`.
///
/// `None` when there is no real discount (missing, not lower, or a
/// non-positive base).
pub fn discount_percent(base: Decimal, discounted: Option<Decimal>) -> Option<u32> {
    let discounted = discounted?;
    if base <= Decimal::ZERO || discounted >= base || discounted < Decimal::ZERO {
        return None;
    }
    let pct = (base - discounted) / base * Decimal::ONE_HUNDRED;
    let pct = pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    pct.to_u32().filter(|p| *p > 0)
}

/// Slot price with a weekend / holiday multiplier applied, to paise.
///
/// Rows written outside the console may hold values whose product does
/// not fit a `Decimal`; those are reported as out of range.
pub fn slot_display_price(base: Decimal, multiplier: Decimal) -> Result<Decimal, AppError> {
    base.checked_mul(multiplier)
        .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Price {base} x {multiplier} is out of range"),
            )
        })
}

/// Currency symbol for the codes the marketplace has used
fn symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "INR" => Some("₹"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// `₹1,499` / `₹1,499.50`: grouped thousands, decimals only when non-zero
pub fn format_price(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);

    let digits = whole.to_u128().unwrap_or(0).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if cents != 0 {
        grouped.push_str(&format!(".{cents:02}"));
    }

    let sign = if negative { "-" } else { "" };
    match symbol(currency) {
        Some(sym) => format!("{sign}{sym}{grouped}"),
        None => format!("{sign}{} {grouped}", currency.to_ascii_uppercase()),
    }
}

/// Price figures a listing row shows
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceDisplay {
    pub base: String,
    pub discounted: Option<String>,
    pub discount_percent: Option<u32>,
}

impl PriceDisplay {
    pub fn new(base: Decimal, discounted: Option<Decimal>, currency: &str) -> Self {
        let discount_percent = discount_percent(base, discounted);
        Self {
            base: format_price(base, currency),
            discounted: discount_percent
                .and(discounted)
                .map(|d| format_price(d, currency)),
            discount_percent,
        }
    }
}

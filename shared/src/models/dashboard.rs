//! Remote procedure results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of `get_admin_dashboard_stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardStats {
    pub total_vendors: i64,
    pub pending_vendors: i64,
    pub total_listings: i64,
    pub pending_listings: i64,
    pub total_theaters: i64,
    pub total_bookings: i64,
    pub total_revenue: Decimal,
}

/// Result of `get_vendor_wallet_balance`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalletBalance {
    pub available: Decimal,
    pub pending: Decimal,
    pub lifetime_earnings: Decimal,
}

/// Result of `calculate_slot_price`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotPriceQuote {
    pub total_price: Decimal,
    #[serde(default)]
    pub is_weekend: bool,
    #[serde(default)]
    pub is_holiday: bool,
}

//! Booking Model (read-only in the console)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub theater_id: Option<Uuid>,
    pub screen_id: Option<Uuid>,
    pub slot_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub booking_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    /// Free-form state owned by the booking procedures (e.g. "confirmed")
    #[serde(default)]
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Booking {
    const TABLE: &'static str = "bookings";
    const RESOURCE: &'static str = "Booking";

    fn id(&self) -> Uuid {
        self.id
    }
}

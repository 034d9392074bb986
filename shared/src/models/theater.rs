//! Private Theater, Screen and Time Slot Models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::{bool_true, default_true, null_default};
use super::status::ApprovalStatus;
use super::Record;

/// Bookable venue (table `private_theaters`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivateTheater {
    pub id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default, deserialize_with = "null_default")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    /// Starting price shown on listings; booking totals come from the backend
    pub base_price: Decimal,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: i64,
}

impl Record for PrivateTheater {
    const TABLE: &'static str = "private_theaters";
    const RESOURCE: &'static str = "Theater";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Editable fields of a private theater
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivateTheaterDraft {
    pub vendor_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub base_price: Decimal,
}

impl From<&PrivateTheater> for PrivateTheaterDraft {
    fn from(t: &PrivateTheater) -> Self {
        Self {
            vendor_id: t.vendor_id,
            name: t.name.clone(),
            description: t.description.clone(),
            address: t.address.clone(),
            city: t.city.clone(),
            state: t.state.clone(),
            pincode: t.pincode.clone(),
            latitude: t.latitude,
            longitude: t.longitude,
            capacity: t.capacity,
            amenities: t.amenities.clone(),
            images: t.images.clone(),
            base_price: t.base_price,
        }
    }
}

/// A screen (auditorium) inside a theater (table `theater_screens`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TheaterScreen {
    pub id: Uuid,
    pub theater_id: Uuid,
    pub screen_name: String,
    #[serde(default)]
    pub screen_number: i32,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default, deserialize_with = "null_default")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    pub hourly_rate: Decimal,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: i64,
}

impl Record for TheaterScreen {
    const TABLE: &'static str = "theater_screens";
    const RESOURCE: &'static str = "Screen";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Editable fields of a screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TheaterScreenDraft {
    pub theater_id: Uuid,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub screen_number: i32,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub hourly_rate: Decimal,
}

impl From<&TheaterScreen> for TheaterScreenDraft {
    fn from(s: &TheaterScreen) -> Self {
        Self {
            theater_id: s.theater_id,
            screen_name: s.screen_name.clone(),
            screen_number: s.screen_number,
            capacity: s.capacity,
            amenities: s.amenities.clone(),
            images: s.images.clone(),
            hourly_rate: s.hourly_rate,
        }
    }
}

/// Bookable time window on a screen (table `theater_time_slots`)
///
/// Times are `HH:MM` (the backend `time` column may add `:SS`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TheaterTimeSlot {
    pub id: Uuid,
    pub theater_id: Uuid,
    pub screen_id: Option<Uuid>,
    pub start_time: String,
    pub end_time: String,
    pub base_price: Decimal,
    #[serde(default = "one")]
    pub weekend_multiplier: Decimal,
    #[serde(default = "one")]
    pub holiday_multiplier: Decimal,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub is_available: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for TheaterTimeSlot {
    const TABLE: &'static str = "theater_time_slots";
    const RESOURCE: &'static str = "Time slot";

    fn id(&self) -> Uuid {
        self.id
    }
}

fn one() -> Decimal {
    Decimal::ONE
}

/// Editable fields of a time slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlotDraft {
    pub theater_id: Uuid,
    pub screen_id: Option<Uuid>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub base_price: Decimal,
    #[serde(default = "one")]
    pub weekend_multiplier: Decimal,
    #[serde(default = "one")]
    pub holiday_multiplier: Decimal,
}

impl From<&TheaterTimeSlot> for TimeSlotDraft {
    fn from(s: &TheaterTimeSlot) -> Self {
        Self {
            theater_id: s.theater_id,
            screen_id: s.screen_id,
            start_time: s.start_time.clone(),
            end_time: s.end_time.clone(),
            base_price: s.base_price,
            weekend_multiplier: s.weekend_multiplier,
            holiday_multiplier: s.holiday_multiplier,
        }
    }
}

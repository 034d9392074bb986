//! Backend record shapes and request payloads
//!
//! Field names and nullability follow the backend schema.

pub mod booking;
pub mod category;
pub mod dashboard;
pub mod payloads;
pub mod serde_helpers;
pub mod service_listing;
pub mod settings;
pub mod status;
pub mod theater;
pub mod vendor;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// A row of a backend table
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table name
    const TABLE: &'static str;
    /// Human-readable name used in error messages
    const RESOURCE: &'static str;

    fn id(&self) -> Uuid;
}

pub use booking::Booking;
pub use category::{Category, CategoryDraft};
pub use dashboard::{DashboardStats, SlotPriceQuote, WalletBalance};
pub use payloads::{ActiveToggle, AvailabilityToggle, StatusChange, VersionedUpdate};
pub use service_listing::{ServiceListing, ServiceListingDraft};
pub use settings::{AdminSetting, AppThemeConfig, SettingUpsert, ThemeUpdate};
pub use status::{ApprovalStatus, DocumentStatus, VerificationStatus};
pub use theater::{
    PrivateTheater, PrivateTheaterDraft, TheaterScreen, TheaterScreenDraft, TheaterTimeSlot,
    TimeSlotDraft,
};
pub use vendor::{Vendor, VendorDocument};

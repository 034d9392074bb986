//! Service Listing Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::{bool_true, default_true, null_default};
use super::status::ApprovalStatus;
use super::Record;

/// Vendor-offered bookable item (table `service_listings`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceListing {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub discounted_price: Option<Decimal>,
    /// e.g. "decoration", "photography", "cake"
    pub service_type: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub videos: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: i64,
}

impl Record for ServiceListing {
    const TABLE: &'static str = "service_listings";
    const RESOURCE: &'static str = "Service listing";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Editable fields of a service listing (create and full-row update)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceListingDraft {
    pub vendor_id: Uuid,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub service_type: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
}

impl From<&ServiceListing> for ServiceListingDraft {
    fn from(l: &ServiceListing) -> Self {
        Self {
            vendor_id: l.vendor_id,
            category_id: l.category_id,
            title: l.title.clone(),
            description: l.description.clone(),
            base_price: l.base_price,
            discounted_price: l.discounted_price,
            service_type: l.service_type.clone(),
            location: l.location.clone(),
            images: l.images.clone(),
            videos: l.videos.clone(),
            inclusions: l.inclusions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_prices_from_float_columns() {
        let row = serde_json::json!({
            "id": "2f1c3a9e-0d57-4e3b-8c1d-5a2f9e0b7c61",
            "vendor_id": "7b0e7a43-9a0c-4f2a-9f43-6a7f1a2b3c4d",
            "category_id": null,
            "title": "Balloon arch",
            "description": null,
            "base_price": 2500.5,
            "discounted_price": 2000,
            "service_type": "decoration",
            "location": null,
            "images": null,
            "approval_status": "approved",
            "created_at": null,
            "updated_at": null,
            "version": 3
        });
        let listing: ServiceListing = serde_json::from_value(row).unwrap();
        assert_eq!(listing.base_price, Decimal::new(25005, 1));
        assert_eq!(listing.discounted_price, Some(Decimal::from(2000)));
        assert!(listing.images.is_empty());
        assert!(listing.videos.is_empty());
        assert_eq!(listing.approval_status, ApprovalStatus::Approved);
        assert_eq!(listing.version, 3);

        let draft = ServiceListingDraft::from(&listing);
        assert_eq!(draft.title, "Balloon arch");
        assert_eq!(draft.category_id, None);
    }
}

//! Vendor Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::{bool_true, default_true};
use super::status::{DocumentStatus, VerificationStatus};
use super::Record;

/// Vendor entity (table `vendors`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    pub id: Uuid,
    /// Auth user that owns this vendor profile
    pub user_id: Option<Uuid>,
    pub business_name: String,
    pub owner_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub is_active: bool,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: i64,
}

impl Record for Vendor {
    const TABLE: &'static str = "vendors";
    const RESOURCE: &'static str = "Vendor";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// KYC / business document uploaded by a vendor (table `vendor_documents`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorDocument {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub document_type: String,
    pub document_url: String,
    #[serde(default)]
    pub status: DocumentStatus,
    pub rejection_reason: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Record for VendorDocument {
    const TABLE: &'static str = "vendor_documents";
    const RESOURCE: &'static str = "Vendor document";

    fn id(&self) -> Uuid {
        self.id
    }
}

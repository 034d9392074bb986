//! Small request bodies shared by several screens

use serde::{Deserialize, Serialize};

/// Moderation decision, e.g. `{"status": "approved"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange<S> {
    pub status: S,
    /// Shown to the vendor when rejecting
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ActiveToggle {
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityToggle {
    pub is_available: bool,
}

/// Full-row edit carrying the version the row was read at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionedUpdate<T> {
    pub version: i64,
    #[serde(flatten)]
    pub data: T,
}

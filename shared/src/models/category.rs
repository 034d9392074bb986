//! Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::{bool_true, default_true};
use super::Record;

/// Listing category (table `categories`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Icon name understood by the storefront apps
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const RESOURCE: &'static str = "Category";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Create / update category payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CategoryDraft {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<Uuid>,
    pub sort_order: Option<i32>,
}

impl From<&Category> for CategoryDraft {
    fn from(c: &Category) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            icon: c.icon.clone(),
            image_url: c.image_url.clone(),
            parent_id: c.parent_id,
            sort_order: Some(c.sort_order),
        }
    }
}

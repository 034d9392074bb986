//! Admin settings and app theme

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::bool_false;
use super::Record;

/// Key/value row (table `admin_settings`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminSetting {
    pub id: Uuid,
    pub setting_key: String,
    #[serde(default)]
    pub setting_value: serde_json::Value,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for AdminSetting {
    const TABLE: &'static str = "admin_settings";
    const RESOURCE: &'static str = "Setting";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Upsert payload, keyed by `setting_key`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingUpsert {
    #[serde(default)]
    pub setting_key: String,
    #[serde(default)]
    pub setting_value: serde_json::Value,
    pub description: Option<String>,
}

/// Storefront theme (table `app_theme_config`, one row)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppThemeConfig {
    pub id: Uuid,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "bool_false")]
    pub dark_mode: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for AppThemeConfig {
    const TABLE: &'static str = "app_theme_config";
    const RESOURCE: &'static str = "Theme";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Theme update payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ThemeUpdate {
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub dark_mode: bool,
}

impl ThemeUpdate {
    /// Color fields that are present, paired with their column name
    pub fn colors(&self) -> Vec<(&'static str, &str)> {
        let mut out = vec![
            ("primary_color", self.primary_color.as_str()),
            ("secondary_color", self.secondary_color.as_str()),
        ];
        for (name, value) in [
            ("accent_color", &self.accent_color),
            ("background_color", &self.background_color),
            ("text_color", &self.text_color),
        ] {
            if let Some(v) = value {
                out.push((name, v.as_str()));
            }
        }
        out
    }
}

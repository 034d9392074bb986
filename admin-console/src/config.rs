//! Admin console configuration

use std::path::PathBuf;

use crate::media::WatermarkPosition;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Longest allowed session idle lifetime (one week)
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Admin console configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Backend project URL
    pub baas_url: String,
    /// Backend service API key
    pub baas_api_key: String,
    /// Backend request timeout in seconds
    pub baas_timeout_secs: u64,
    /// Auth user ids always treated as administrators
    pub admin_user_ids: Vec<uuid::Uuid>,
    /// `app_metadata.role` value that grants admin access (empty disables role check)
    pub admin_role: Option<String>,
    /// Idle lifetime of a console session
    pub session_ttl_minutes: i64,
    /// Upload size limit, checked before any storage call
    pub max_upload_bytes: usize,
    /// Logo composited onto uploaded images; no watermark when unset
    pub watermark_logo_path: Option<PathBuf>,
    pub watermark_position: WatermarkPosition,
    pub watermark_opacity: f32,
    /// ISO currency code used for price display
    pub currency: String,
    /// Login attempts allowed per IP per minute
    pub login_rate_limit: u32,
    pub log_level: String,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let admin_user_ids = parse_id_list(&std::env::var("ADMIN_USER_IDS").unwrap_or_default())?;

        let watermark_position = match std::env::var("WATERMARK_POSITION") {
            Ok(v) => v.parse::<WatermarkPosition>()?,
            Err(_) => WatermarkPosition::default(),
        };

        let watermark_opacity: f32 = Self::parsed("WATERMARK_OPACITY", 0.5);
        if !(0.0..=1.0).contains(&watermark_opacity) {
            return Err(format!("WATERMARK_OPACITY must be within 0..=1, got {watermark_opacity}").into());
        }

        let session_ttl_minutes = check_session_ttl(Self::parsed("SESSION_TTL_MINUTES", 480))?;

        Ok(Self {
            http_port: Self::parsed("HTTP_PORT", 8080),
            baas_url: std::env::var("BAAS_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            baas_api_key: Self::require_secret("BAAS_API_KEY", &environment)?,
            baas_timeout_secs: Self::parsed(
                "BAAS_TIMEOUT_SECS",
                baas_client::config::DEFAULT_TIMEOUT_SECS,
            ),
            admin_user_ids,
            admin_role: match std::env::var("ADMIN_ROLE") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v.trim().to_string()),
                Err(_) => Some("admin".into()),
            },
            session_ttl_minutes,
            max_upload_bytes: Self::parsed("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            watermark_logo_path: std::env::var("WATERMARK_LOGO_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            watermark_position,
            watermark_opacity,
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "INR".into()),
            login_rate_limit: Self::parsed("LOGIN_RATE_LIMIT", 10),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Defaults for tests and local tooling, no environment access
    pub fn for_tests() -> Self {
        Self {
            environment: "development".into(),
            http_port: 0,
            baas_url: "http://memory.local".into(),
            baas_api_key: String::new(),
            baas_timeout_secs: baas_client::config::DEFAULT_TIMEOUT_SECS,
            admin_user_ids: Vec::new(),
            admin_role: Some("admin".into()),
            session_ttl_minutes: 480,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            watermark_logo_path: None,
            watermark_position: WatermarkPosition::default(),
            watermark_opacity: 0.5,
            currency: "INR".into(),
            login_rate_limit: 10,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Session TTL must be positive and at most a week
fn check_session_ttl(minutes: i64) -> Result<i64, BoxError> {
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        return Err(format!(
            "SESSION_TTL_MINUTES must be within 1..={MAX_SESSION_TTL_MINUTES}, got {minutes}"
        )
        .into());
    }
    Ok(minutes)
}

/// Comma-separated UUID list; blanks are skipped
fn parse_id_list(raw: &str) -> Result<Vec<uuid::Uuid>, BoxError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<uuid::Uuid>()
                .map_err(|e| -> BoxError {
                    format!("ADMIN_USER_IDS entry {s:?} is not a UUID: {e}").into()
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list(" 6f1d2c3b-4a5e-4f60-8a7b-9c0d1e2f3a4b , ,").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(parse_id_list("").unwrap().is_empty());
        assert!(parse_id_list("not-a-uuid").is_err());
    }

    #[test]
    fn test_session_ttl_bounds() {
        assert_eq!(check_session_ttl(480).unwrap(), 480);
        assert_eq!(check_session_ttl(MAX_SESSION_TTL_MINUTES).unwrap(), MAX_SESSION_TTL_MINUTES);
        assert!(check_session_ttl(0).is_err());
        assert!(check_session_ttl(-5).is_err());
        assert!(check_session_ttl(MAX_SESSION_TTL_MINUTES + 1).is_err());
    }
}

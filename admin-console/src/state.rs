//! Application state for the admin console

use std::sync::Arc;

use baas_client::{
    AuthProvider, ClientConfig, DataStore, MemoryBackend, ObjectStorage, RestBackend, Table,
};
use serde::de::DeserializeOwned;
use shared::error::AppError;
use shared::models::Record;

use crate::auth::{AdminPolicy, AllowListPolicy, RateLimiter, SessionStore};
use crate::config::Config;
use crate::media::{Watermark, WatermarkOptions};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Tables, views and remote procedures
    pub store: Arc<dyn DataStore>,
    /// Image buckets
    pub storage: Arc<dyn ObjectStorage>,
    /// Hosted sign-in and the auth-state-change stream
    pub auth: Arc<dyn AuthProvider>,
    /// Who counts as an administrator
    pub policy: Arc<dyn AdminPolicy>,
    pub sessions: SessionStore,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
    /// Logo composited onto uploads; `None` uploads originals
    pub watermark: Option<Arc<Watermark>>,
}

impl AppState {
    /// Wire the console to the hosted backend over REST
    pub fn connect(config: Config) -> Result<Self, BoxError> {
        let client_config = ClientConfig::new(&config.baas_url, &config.baas_api_key)
            .with_timeout(config.baas_timeout_secs);
        let backend = Arc::new(RestBackend::new(client_config)?);
        Ok(Self::new(config, backend.clone(), backend.clone(), backend))
    }

    pub fn new(
        config: Config,
        store: Arc<dyn DataStore>,
        storage: Arc<dyn ObjectStorage>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let policy: Arc<dyn AdminPolicy> = Arc::new(AllowListPolicy::from_config(&config));
        let watermark = load_watermark(&config).map(Arc::new);
        Self {
            sessions: SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes)),
            config: Arc::new(config),
            store,
            storage,
            auth,
            policy,
            rate_limiter: RateLimiter::new(),
            watermark,
        }
    }

    /// Everything served by one in-memory backend
    pub fn with_memory(config: Config, backend: MemoryBackend) -> Self {
        let backend = Arc::new(backend);
        Self::new(config, backend.clone(), backend.clone(), backend)
    }

    pub fn with_watermark(mut self, watermark: Option<Watermark>) -> Self {
        self.watermark = watermark.map(Arc::new);
        self
    }

    /// Typed access to the table behind `T`
    pub fn table<T: Record>(&self) -> Table<T> {
        Table::new(self.store.clone())
    }

    /// Call a remote procedure and decode its result
    pub async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        args: serde_json::Value,
    ) -> Result<T, AppError> {
        let value = self.store.rpc(function, args).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(function, error = %e, "Unexpected remote procedure result");
            AppError::backend("Unexpected response from the backend")
        })
    }
}

/// Load the configured logo. A missing or unreadable file is logged and
/// uploads continue without a watermark.
fn load_watermark(config: &Config) -> Option<Watermark> {
    let path = config.watermark_logo_path.as_ref()?;
    let options = WatermarkOptions {
        position: config.watermark_position,
        opacity: config.watermark_opacity,
        ..Default::default()
    };
    match Watermark::load(path, options) {
        Ok(w) => {
            tracing::info!(path = %path.display(), position = %options.position, "Watermark logo loaded");
            Some(w)
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Watermark logo unavailable, uploads will not be watermarked"
            );
            None
        }
    }
}

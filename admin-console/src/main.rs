//! admin-console: marketplace administration service
//!
//! Long-running service that:
//! - Signs administrators in against the hosted backend
//! - Serves the dashboard, moderation and catalogue screens
//! - Watermarks and stores uploaded listing images

use std::net::SocketAddr;
use std::time::Duration;

use admin_console::auth::spawn_auth_listener;
use admin_console::{AppState, Config, build_app, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger_with_file(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        "Starting admin-console v{} (env: {})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let state = AppState::connect(config)?;

    // Sign-outs and role changes end sessions without a restart
    let listener_handle = spawn_auth_listener(
        state.auth.clone(),
        state.sessions.clone(),
        state.policy.clone(),
    );

    // Periodic cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
            let expired = sessions.cleanup();
            if expired > 0 {
                tracing::debug!(expired, "Expired admin sessions removed");
            }
        }
    });

    let app = build_app(state);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("admin-console HTTP listening on {http_addr}");

    axum::serve(
        http_listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    listener_handle.abort();
    tracing::info!("admin-console stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

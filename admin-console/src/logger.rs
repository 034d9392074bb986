//! Logging setup
//!
//! Console output always; a daily rolling file as well when a log
//! directory is configured. `RUST_LOG` overrides the configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "admin_console={level},baas_client={level},tower_http=info"
        ))
    })
}

/// Initialize the global subscriber.
///
/// Keep the returned guard alive for the life of the process, or buffered
/// file output is lost.
pub fn init_logger_with_file(level: &str, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let console = fmt::layer().with_target(false);

    let file = log_dir
        .map(Path::new)
        .filter(|dir| {
            let ok = std::fs::create_dir_all(dir).is_ok();
            if !ok {
                eprintln!("Log directory {} unavailable, logging to console only", dir.display());
            }
            ok
        })
        .map(|dir| {
            let appender = tracing_appender::rolling::daily(dir, "admin-console");
            tracing_appender::non_blocking(appender)
        });

    match file {
        Some((writer, guard)) => {
            tracing_subscriber::registry()
                .with(filter(level))
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter(level))
                .with(console)
                .init();
            None
        }
    }
}

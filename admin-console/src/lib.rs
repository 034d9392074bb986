//! admin-console: operator dashboard for the decoration and private
//! theater marketplace.
//!
//! Reads and writes go through the hosted backend (tables, remote
//! procedures, storage buckets and sign-in) behind the traits in
//! `baas_client`, so the whole console can run against an in-memory
//! backend in tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod listing;
pub mod logger;
pub mod media;
pub mod middleware;
pub mod pricing;
pub mod state;
pub mod validation;

pub use api::build_app;
pub use config::Config;
pub use state::AppState;

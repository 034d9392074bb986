//! Backend client for the hosted marketplace backend
//!
//! Three traits describe everything the console needs from the backend:
//! [`DataStore`] for tables and remote procedures, [`ObjectStorage`] for
//! buckets and [`AuthProvider`] for sign-in and the auth-state-change
//! stream. [`RestBackend`] talks to the real service; [`MemoryBackend`]
//! is an in-process fake.

pub mod config;
pub mod error;
pub mod memory;
pub mod query;
pub mod rest;
pub mod store;
pub mod table;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use memory::{Call, CallKind, MemoryBackend};
pub use query::{Query, compare_json};
pub use rest::RestBackend;
pub use store::{AuthEvent, AuthProvider, AuthSession, AuthUser, DataStore, ObjectStorage};
pub use table::Table;

//! Backend contract
//!
//! The console only talks to the hosted backend through these three
//! traits, so the REST implementation and the in-memory fake are
//! interchangeable behind `Arc<dyn ...>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{ClientResult, Query};

/// Tables, views and remote procedures
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>>;

    /// Insert one row, returning it as stored
    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value>;

    /// Merge `patch` into every row matching `query`, returning the updated rows
    async fn update(&self, table: &str, query: &Query, patch: Value) -> ClientResult<Vec<Value>>;

    /// Delete matching rows, returning how many were removed
    async fn delete(&self, table: &str, query: &Query) -> ClientResult<usize>;

    /// Insert or merge on the unique column `on_conflict`
    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> ClientResult<Value>;

    /// Invoke a named remote procedure with keyword arguments
    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value>;
}

/// Object storage buckets
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path`, returning the stored path
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> ClientResult<String>;

    fn public_url(&self, bucket: &str, path: &str) -> String;

    async fn remove(&self, bucket: &str, paths: &[String]) -> ClientResult<()>;
}

/// Hosted authentication
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> ClientResult<AuthSession>;

    /// Resolve the user behind an access token
    async fn get_user(&self, access_token: &str) -> ClientResult<AuthUser>;

    async fn refresh_session(&self, refresh_token: &str) -> ClientResult<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> ClientResult<()>;

    /// Auth-state-change stream
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Identity returned by the auth service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    /// Database role (usually "authenticated")
    pub role: Option<String>,
    /// Server-controlled claims; `app_metadata.role` carries the app role
    #[serde(default)]
    pub app_metadata: Value,
}

impl AuthUser {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            role: Some("authenticated".to_string()),
            app_metadata: Value::Null,
        }
    }

    pub fn with_app_role(mut self, role: &str) -> Self {
        self.app_metadata = serde_json::json!({ "role": role });
        self
    }

    /// Application role claim, if any
    pub fn app_role(&self) -> Option<&str> {
        self.app_metadata.get("role").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Seconds until `access_token` expires
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Auth-state-change event
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut { user_id: Option<Uuid> },
    TokenRefreshed(AuthUser),
    UserUpdated(AuthUser),
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "SIGNED_IN",
            AuthEvent::SignedOut { .. } => "SIGNED_OUT",
            AuthEvent::TokenRefreshed(_) => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated(_) => "USER_UPDATED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_role_from_metadata() {
        let user: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "9a7b6c5d-4e3f-4a1b-8c2d-0e9f8a7b6c5d",
            "email": "ops@example.com",
            "role": "authenticated",
            "app_metadata": {"provider": "email", "role": "admin"}
        }))
        .unwrap();
        assert_eq!(user.app_role(), Some("admin"));

        let plain = AuthUser::new(Uuid::new_v4(), "someone@example.com");
        assert_eq!(plain.app_role(), None);
    }
}

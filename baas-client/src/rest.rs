//! REST implementation of the backend contract

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::{
    AuthEvent, AuthProvider, AuthSession, AuthUser, ClientConfig, ClientError, ClientResult,
    DataStore, ObjectStorage, Query,
};

/// Auth event channel capacity
const AUTH_EVENT_CAPACITY: usize = 64;

/// Error body returned by the table, storage and auth services
#[derive(serde::Deserialize, Default)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default, alias = "msg", alias = "error_description", alias = "error")]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Network client for the hosted backend
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    config: ClientConfig,
    events: broadcast::Sender<AuthEvent>,
}

impl RestBackend {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Ok(Self {
            client,
            config,
            events,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attach `apikey` and a bearer token (session token if given, else the API key)
    fn authed(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.config.api_key);
        req.header("apikey", &self.config.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", bearer))
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, &text));
        }
        Ok(response.json().await?)
    }

    /// Non-success response without a body we care about
    async fn check(response: reqwest::Response) -> ClientResult<()> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, &text));
        }
        Ok(())
    }

    fn status_error(status: StatusCode, text: &str) -> ClientError {
        let body: BackendErrorBody = serde_json::from_str(text).unwrap_or_default();
        let message = match (body.message, body.details) {
            (Some(m), Some(d)) => format!("{} ({})", m, d),
            (Some(m), None) => m,
            (None, _) if text.is_empty() => status.to_string(),
            (None, _) => text.to_string(),
        };
        // Postgres unique violation surfaces as 409 from the table API
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                code: body.code.map(|c| match c {
                    Value::String(s) => s,
                    other => other.to_string(),
                }),
                message,
            },
        }
    }

    fn emit(&self, event: AuthEvent) {
        tracing::debug!(event = event.name(), "Auth state change");
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Single-row responses come back as one-element arrays
fn first_row(rows: Vec<Value>, what: &str) -> ClientResult<Value> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ClientError::InvalidResponse(format!("{} returned no row", what)))
}

#[async_trait]
impl DataStore for RestBackend {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        let req = self
            .client
            .get(self.config.rest_url(table))
            .query(&query.to_pairs());
        let response = self.authed(req, None).send().await?;
        Self::handle_response(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        let req = self
            .client
            .post(self.config.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.authed(req, None).send().await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        first_row(rows, table)
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> ClientResult<Vec<Value>> {
        let req = self
            .client
            .patch(self.config.rest_url(table))
            .query(&query.to_pairs())
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = self.authed(req, None).send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, table: &str, query: &Query) -> ClientResult<usize> {
        let req = self
            .client
            .delete(self.config.rest_url(table))
            .query(&query.to_pairs())
            .header("Prefer", "return=representation");
        let response = self.authed(req, None).send().await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        Ok(rows.len())
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> ClientResult<Value> {
        let req = self
            .client
            .post(self.config.rest_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&row);
        let response = self.authed(req, None).send().await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        first_row(rows, table)
    }

    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value> {
        let req = self.client.post(self.config.rpc_url(function)).json(&args);
        let response = self.authed(req, None).send().await?;
        Self::handle_response(response)
            .await
            .map_err(|e| match e {
                ClientError::Api { message, .. } | ClientError::Validation(message) => {
                    ClientError::Rpc {
                        function: function.to_string(),
                        message,
                    }
                }
                other => other,
            })
    }
}

#[async_trait]
impl ObjectStorage for RestBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> ClientResult<String> {
        let req = self
            .client
            .post(self.config.storage_url(bucket, path))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes);
        let response = self.authed(req, None).send().await?;
        Self::check(response).await.map_err(|e| match e {
            ClientError::Api { message, .. } | ClientError::Validation(message) => {
                ClientError::Storage(message)
            }
            other => other,
        })?;
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.config.public_object_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> ClientResult<()> {
        let url = format!("{}/storage/v1/object/{}", self.config.base(), bucket);
        let req = self
            .client
            .delete(url)
            .json(&json!({ "prefixes": paths }));
        let response = self.authed(req, None).send().await?;
        Self::check(response).await
    }
}

#[async_trait]
impl AuthProvider for RestBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthSession> {
        let req = self
            .client
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let response = self.authed(req, None).send().await?;
        let session: AuthSession = Self::handle_response(response).await.map_err(|e| match e {
            // Wrong credentials come back as 400 invalid_grant
            ClientError::Validation(message) => ClientError::Unauthorized(message),
            other => other,
        })?;
        self.emit(AuthEvent::SignedIn(session.user.clone()));
        Ok(session)
    }

    async fn get_user(&self, access_token: &str) -> ClientResult<AuthUser> {
        let req = self.client.get(self.config.auth_url("user"));
        let response = self.authed(req, Some(access_token)).send().await?;
        Self::handle_response(response).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> ClientResult<AuthSession> {
        let req = self
            .client
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));
        let response = self.authed(req, None).send().await?;
        let session: AuthSession = Self::handle_response(response).await?;
        self.emit(AuthEvent::TokenRefreshed(session.user.clone()));
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> ClientResult<()> {
        let user_id = self.get_user(access_token).await.ok().map(|u| u.id);
        let req = self.client.post(self.config.auth_url("logout"));
        let response = self.authed(req, Some(access_token)).send().await?;
        Self::check(response).await?;
        self.emit(AuthEvent::SignedOut { user_id });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"code":"23505","message":"duplicate key value","details":"Key (email) exists"}"#;
        match RestBackend::status_error(StatusCode::CONFLICT, body) {
            ClientError::Conflict(msg) => {
                assert_eq!(msg, "duplicate key value (Key (email) exists)")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            RestBackend::status_error(StatusCode::UNAUTHORIZED, r#"{"msg":"JWT expired"}"#),
            ClientError::Unauthorized(m) if m == "JWT expired"
        ));
        match RestBackend::status_error(StatusCode::SERVICE_UNAVAILABLE, "") {
            err @ ClientError::Api { status: 503, .. } => assert!(err.is_unavailable()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bearer_is_session_token_or_api_key() {
        let backend = RestBackend::new(ClientConfig::new("https://demo.example", "anon-key")).unwrap();
        let url = backend.config().rest_url("vendors");

        let req = backend.authed(backend.client.get(&url), None).build().unwrap();
        assert_eq!(req.headers()["apikey"], "anon-key");
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer anon-key");

        let req = backend
            .authed(backend.client.get(&url), Some("user-jwt"))
            .build()
            .unwrap();
        assert_eq!(req.headers()["apikey"], "anon-key");
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer user-jwt");
    }

    #[tokio::test]
    async fn test_subscribe_before_any_event() {
        let backend = RestBackend::new(ClientConfig::default()).unwrap();
        let mut rx = backend.subscribe();
        backend.emit(AuthEvent::SignedOut { user_id: None });
        assert_eq!(rx.recv().await.unwrap(), AuthEvent::SignedOut { user_id: None });
    }
}

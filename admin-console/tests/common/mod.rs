//! Shared harness: the full app over an in-memory backend
#![allow(dead_code)]

use admin_console::{AppState, Config, build_app};
use axum::Router;
use axum::body::Body;
use baas_client::{AuthUser, MemoryBackend};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "ops@marketplace.example";
pub const MEMBER_EMAIL: &str = "guest@marketplace.example";
pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub app: Router,
    pub backend: MemoryBackend,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(|state| state)
    }

    /// Build with a tweak applied to the state, e.g. a watermark
    pub fn with_state(tweak: impl FnOnce(AppState) -> AppState) -> Self {
        let backend = MemoryBackend::new();
        backend.add_user(
            ADMIN_EMAIL,
            PASSWORD,
            AuthUser::new(Uuid::new_v4(), ADMIN_EMAIL).with_app_role("admin"),
        );
        backend.add_user(
            MEMBER_EMAIL,
            PASSWORD,
            AuthUser::new(Uuid::new_v4(), MEMBER_EMAIL),
        );
        let state = tweak(AppState::with_memory(Config::for_tests(), backend.clone()));
        Self {
            app: build_app(state.clone()),
            backend,
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Sign in and return the session id; backend call log is cleared
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/admin/api/login",
                None,
                serde_json::json!({ "email": email, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        self.backend.clear_calls();
        body["session_id"].as_str().unwrap().to_string()
    }

    pub async fn admin(&self) -> String {
        self.login(ADMIN_EMAIL).await
    }

    pub async fn get(&self, uri: &str, session: &str) -> (StatusCode, Value) {
        self.send(request("GET", uri, Some(session))).await
    }

    pub async fn put(&self, uri: &str, session: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, Some(session), body)).await
    }

    pub async fn post(&self, uri: &str, session: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, Some(session), body)).await
    }
}

pub fn request(method: &str, uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("x-admin-session", session);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, session: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(session) = session {
        builder = builder.header("x-admin-session", session);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub const BOUNDARY: &str = "----admin-console-test-boundary";

/// Single-file multipart body under the `file` field
pub fn multipart_request(uri: &str, session: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-admin-session", session)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn listing_row(title: &str, price: f64, status: &str) -> Value {
    serde_json::json!({
        "id": Uuid::new_v4(),
        "vendor_id": Uuid::new_v4(),
        "category_id": Uuid::new_v4(),
        "title": title,
        "description": format!("{title} for birthdays and private screenings"),
        "base_price": price,
        "discounted_price": null,
        "approval_status": status,
        "is_active": true,
        "version": 1,
    })
}

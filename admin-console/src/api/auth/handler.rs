//! Sign-in handlers: login, logout, current session

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use baas_client::ClientError;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use uuid::Uuid;

use crate::auth::{LANDING_PATH, LOGIN_PATH, SESSION_COOKIE, current_session, guard};
use crate::state::AppState;
use crate::validation::{MAX_EMAIL_LEN, validate_required_text};

use crate::api::ApiResult;

/// Landing page for administrators after sign-in
const DASHBOARD_PATH: &str = "/admin";

/// POST /admin/api/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub is_admin: bool,
    /// Dashboard for administrators, the public landing page for everyone else
    pub redirect: String,
}

fn session_cookie(state: &AppState, value: &str, max_age_secs: i64) -> String {
    let secure = if state.config.is_development() { "" } else { "; Secure" };
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}{secure}")
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    validate_required_text(&email, "email", MAX_EMAIL_LEN)?;
    if req.password.is_empty() {
        return Err(AppError::required("password"));
    }

    let auth = state
        .auth
        .sign_in_with_password(&email, &req.password)
        .await
        .map_err(|e| match e {
            ClientError::Unauthorized(_) | ClientError::Validation(_) => {
                tracing::info!(email = %email, "Login rejected by auth service");
                AppError::invalid_credentials()
            }
            other => other.into(),
        })?;

    let session = state.sessions.create(auth);
    let is_admin = state.policy.is_admin(&session.user);
    tracing::info!(user_id = %session.user.id, is_admin, "Console session started");

    let cookie = session_cookie(
        &state,
        &session.id.to_string(),
        state.config.session_ttl_minutes * 60,
    );
    let body = LoginResponse {
        session_id: session.id,
        user_id: session.user.id,
        email: session.user.email.clone(),
        is_admin,
        redirect: if is_admin { DASHBOARD_PATH } else { LANDING_PATH }.to_string(),
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

/// POST /admin/api/logout - always succeeds; the backend sign-out is best effort
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(session) = guard::session_id(&headers).and_then(|id| state.sessions.remove(id)) {
        if let Err(e) = state.auth.sign_out(&session.access_token).await {
            tracing::warn!(user_id = %session.user.id, error = %e, "Backend sign-out failed");
        }
        tracing::info!(user_id = %session.user.id, "Console session ended");
    }
    (
        [(header::SET_COOKIE, session_cookie(&state, "", 0))],
        Json(serde_json::json!({ "redirect": LOGIN_PATH })),
    )
}

/// GET /admin/api/session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SessionInfo> {
    let session = current_session(&state, &headers).await?;
    Ok(Json(SessionInfo {
        session_id: session.id,
        user_id: session.user.id,
        email: session.user.email.clone(),
        is_admin: state.policy.is_admin(&session.user),
        created_at: session.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use baas_client::MemoryBackend;

    #[test]
    fn test_cookie_secure_outside_development() {
        let state = AppState::with_memory(Config::for_tests(), MemoryBackend::new());
        let cookie = session_cookie(&state, "abc", 60);
        assert!(cookie.starts_with("admin_session=abc;"));
        assert!(!cookie.contains("Secure"));

        let mut config = Config::for_tests();
        config.environment = "production".into();
        let state = AppState::with_memory(config, MemoryBackend::new());
        assert!(session_cookie(&state, "abc", 60).ends_with("; Secure"));
    }
}

//! Admin guard for every `/admin` route

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::HeaderMap;
use shared::error::{AppError, ErrorCode};
use uuid::Uuid;

use super::session::{AdminSession, SESSION_COOKIE, SESSION_HEADER, SessionError};
use crate::state::AppState;

/// Where unauthenticated callers are sent
pub const LOGIN_PATH: &str = "/admin/login";

/// Where authenticated non-admins are sent
pub const LANDING_PATH: &str = "/";

/// The administrator behind a guarded request
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl From<&AdminSession> for AdminIdentity {
    fn from(s: &AdminSession) -> Self {
        Self {
            session_id: s.id,
            user_id: s.user.id,
            email: s.user.email.clone(),
        }
    }
}

/// Session id from the `admin_session` cookie or the `x-admin-session` header
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let from_header = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    let from_cookie = || {
        headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim())
    };

    from_header
        .or_else(from_cookie)
        .and_then(|raw| raw.parse().ok())
}

fn unauthenticated(code: ErrorCode) -> AppError {
    AppError::new(code).with_redirect(LOGIN_PATH)
}

/// Resolve the caller's session, refreshing the backend token when it has lapsed.
///
/// Does not apply the admin policy.
pub async fn current_session(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, AppError> {
    let id = session_id(headers).ok_or_else(|| unauthenticated(ErrorCode::NotAuthenticated))?;
    let session = state.sessions.get(id).map_err(|e| match e {
        SessionError::Missing => unauthenticated(ErrorCode::NotAuthenticated),
        SessionError::Expired => unauthenticated(ErrorCode::SessionExpired),
    })?;

    if !session.token_expired(chrono::Utc::now()) {
        return Ok(session);
    }

    let Some(refresh_token) = session.refresh_token.clone() else {
        state.sessions.remove(id);
        return Err(unauthenticated(ErrorCode::SessionExpired));
    };
    match state.auth.refresh_session(&refresh_token).await {
        Ok(fresh) => state
            .sessions
            .replace_tokens(id, fresh)
            .ok_or_else(|| unauthenticated(ErrorCode::SessionExpired)),
        Err(e) => {
            tracing::warn!(session_id = %id, error = %e, "Token refresh failed, ending session");
            state.sessions.remove(id);
            Err(unauthenticated(ErrorCode::SessionExpired))
        }
    }
}

/// Middleware: only administrators get through.
///
/// Missing or expired session: 401 with a redirect to the login page.
/// Signed in but not an administrator: 403 with a redirect to the landing page.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match current_session(&state, request.headers()).await {
        Ok(s) => s,
        Err(e) => return e.into_response(),
    };

    if !state.policy.is_admin(&session.user) {
        tracing::warn!(
            user_id = %session.user.id,
            path = %request.uri().path(),
            "Non-admin identity refused"
        );
        return AppError::new(ErrorCode::AdminRequired)
            .with_redirect(LANDING_PATH)
            .into_response();
    }

    let identity = AdminIdentity::from(&session);
    request.extensions_mut().insert(identity.clone());
    let mut response = next.run(request).await;
    // Visible to the outer logging middleware
    response.extensions_mut().insert(identity);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_session_id_from_cookie_or_header() {
        let id = Uuid::new_v4();

        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; other=1")).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));

        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(session_id(&headers), Some(id));

        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, HeaderValue::from_static("admin_session=nope"));
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }
}

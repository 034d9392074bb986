//! Console sessions
//!
//! A successful sign-in against the auth service produces an opaque
//! session id (UUID v4). The id travels as a cookie or header; the
//! backend tokens stay on the server.

use std::sync::Arc;

use baas_client::{AuthSession, AuthUser};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::policy::AdminPolicy;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "admin_session";

/// Header alternative to the cookie for API clients
pub const SESSION_HEADER: &str = "x-admin-session";

#[derive(Debug, Clone)]
pub struct AdminSession {
    pub id: Uuid,
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// When the backend access token stops being accepted
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl AdminSession {
    pub fn token_expired(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no such session")]
    Missing,
    #[error("session expired")]
    Expired,
}

/// In-process session table with an idle timeout
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, AdminSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn create(&self, auth: AuthSession) -> AdminSession {
        let now = Utc::now();
        let session = AdminSession {
            id: Uuid::new_v4(),
            token_expires_at: auth.expires_in.map(|secs| now + Duration::seconds(secs)),
            user: auth.user,
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            created_at: now,
            last_seen: now,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Look up a live session and mark it as seen.
    ///
    /// An idle session is dropped on access.
    pub fn get(&self, id: Uuid) -> Result<AdminSession, SessionError> {
        let now = Utc::now();
        let mut entry = self.sessions.get_mut(&id).ok_or(SessionError::Missing)?;
        if now - entry.last_seen > self.ttl {
            drop(entry);
            self.sessions.remove(&id);
            return Err(SessionError::Expired);
        }
        entry.last_seen = now;
        Ok(entry.clone())
    }

    /// Swap in fresh backend tokens after a refresh
    pub fn replace_tokens(&self, id: Uuid, auth: AuthSession) -> Option<AdminSession> {
        let now = Utc::now();
        let mut entry = self.sessions.get_mut(&id)?;
        entry.access_token = auth.access_token;
        entry.refresh_token = auth.refresh_token.or(entry.refresh_token.take());
        entry.token_expires_at = auth.expires_in.map(|secs| now + Duration::seconds(secs));
        entry.user = auth.user;
        Some(entry.clone())
    }

    pub fn remove(&self, id: Uuid) -> Option<AdminSession> {
        self.sessions.remove(&id).map(|(_, s)| s)
    }

    /// Drop every session of one user, returning how many were dropped
    pub fn remove_user(&self, user_id: Uuid) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user.id != user_id);
        before - self.sessions.len()
    }

    /// Store a newer identity for `user` and revoke their sessions if the
    /// policy no longer admits them. Returns how many sessions were revoked.
    pub fn reevaluate(&self, user: &AuthUser, policy: &dyn AdminPolicy) -> usize {
        if !policy.is_admin(user) {
            return self.remove_user(user.id);
        }
        for mut entry in self.sessions.iter_mut() {
            if entry.user.id == user.id {
                entry.user = user.clone();
            }
        }
        0
    }

    /// Remove idle sessions, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now - s.last_seen <= self.ttl);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    fn backdate(&self, id: Uuid, by: Duration) {
        if let Some(mut s) = self.sessions.get_mut(&id) {
            s.last_seen -= by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::policy::AllowListPolicy;

    fn auth_session(user: AuthUser) -> AuthSession {
        AuthSession {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_in: Some(3600),
            user,
        }
    }

    fn user() -> AuthUser {
        AuthUser::new(Uuid::new_v4(), "admin@example.com").with_app_role("admin")
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new(Duration::minutes(30));
        let session = store.create(auth_session(user()));
        let found = store.get(session.id).unwrap();
        assert_eq!(found.user, session.user);
        assert!(!found.token_expired(Utc::now()));
        assert_eq!(store.get(Uuid::new_v4()).unwrap_err(), SessionError::Missing);
    }

    #[test]
    fn test_idle_session_expires() {
        let store = SessionStore::new(Duration::minutes(30));
        let session = store.create(auth_session(user()));
        store.backdate(session.id, Duration::minutes(31));
        assert_eq!(store.get(session.id).unwrap_err(), SessionError::Expired);
        // Gone after the first expired lookup
        assert_eq!(store.get(session.id).unwrap_err(), SessionError::Missing);
    }

    #[test]
    fn test_cleanup() {
        let store = SessionStore::new(Duration::minutes(30));
        let stale = store.create(auth_session(user()));
        let fresh = store.create(auth_session(user()));
        store.backdate(stale.id, Duration::hours(2));
        assert_eq!(store.cleanup(), 1);
        assert!(store.get(fresh.id).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_user_drops_all_their_sessions() {
        let store = SessionStore::new(Duration::minutes(30));
        let admin = user();
        store.create(auth_session(admin.clone()));
        store.create(auth_session(admin.clone()));
        let other = store.create(auth_session(user()));
        assert_eq!(store.remove_user(admin.id), 2);
        assert!(store.get(other.id).is_ok());
    }

    #[test]
    fn test_reevaluate_revokes_demoted_user() {
        let store = SessionStore::new(Duration::minutes(30));
        let policy = AllowListPolicy::new([], Some("admin".into()));
        let admin = user();
        let session = store.create(auth_session(admin.clone()));

        // Still admin: identity refreshed in place
        let mut renamed = admin.clone();
        renamed.email = Some("new@example.com".into());
        assert_eq!(store.reevaluate(&renamed, &policy), 0);
        assert_eq!(
            store.get(session.id).unwrap().user.email.as_deref(),
            Some("new@example.com")
        );

        // Role claim removed
        let demoted = admin.with_app_role("vendor");
        assert_eq!(store.reevaluate(&demoted, &policy), 1);
        assert!(store.is_empty());
    }
}

//! Auth-state-change listener
//!
//! Keeps the session table in step with the auth service: sign-outs drop
//! sessions, and refreshed or updated identities go back through the
//! admin policy.

use std::sync::Arc;

use baas_client::{AuthEvent, AuthProvider};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::policy::AdminPolicy;
use super::session::SessionStore;

/// Apply one event to the session table
pub fn handle_event(sessions: &SessionStore, policy: &dyn AdminPolicy, event: &AuthEvent) {
    match event {
        AuthEvent::SignedIn(user) => {
            tracing::debug!(user_id = %user.id, "Auth event: signed in");
        }
        AuthEvent::SignedOut { user_id: Some(id) } => {
            let dropped = sessions.remove_user(*id);
            tracing::info!(user_id = %id, dropped, "Auth event: signed out");
        }
        AuthEvent::SignedOut { user_id: None } => {
            tracing::debug!("Auth event: signed out (unknown user)");
        }
        AuthEvent::TokenRefreshed(user) | AuthEvent::UserUpdated(user) => {
            let revoked = sessions.reevaluate(user, policy);
            if revoked > 0 {
                tracing::warn!(
                    user_id = %user.id,
                    event = event.name(),
                    revoked,
                    "Identity no longer admin, sessions revoked"
                );
            }
        }
    }
}

/// Follow the auth-state-change stream until it closes
pub fn spawn_auth_listener(
    auth: Arc<dyn AuthProvider>,
    sessions: SessionStore,
    policy: Arc<dyn AdminPolicy>,
) -> JoinHandle<()> {
    let mut rx = auth.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => handle_event(&sessions, policy.as_ref(), &event),
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("Auth listener lagged, skipped {n} events");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Auth event stream closed, listener stopping");
                    break;
                }
            }
        }
    })
}

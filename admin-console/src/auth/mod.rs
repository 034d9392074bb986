//! Admin authentication: sessions, policy, guard and login throttling

pub mod guard;
pub mod listener;
pub mod policy;
pub mod rate_limit;
pub mod session;

pub use guard::{AdminIdentity, LANDING_PATH, LOGIN_PATH, current_session, require_admin};
pub use listener::spawn_auth_listener;
pub use policy::{AdminPolicy, AllowListPolicy};
pub use rate_limit::RateLimiter;
pub use session::{AdminSession, SESSION_COOKIE, SessionStore};

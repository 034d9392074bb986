//! Who counts as an administrator

use std::collections::HashSet;

use baas_client::AuthUser;
use uuid::Uuid;

/// Decides whether an authenticated identity may use the console.
///
/// Evaluated on every guarded request and again whenever the auth
/// service reports a refreshed or updated identity.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, user: &AuthUser) -> bool;
}

/// Admin when the user id is on the allow-list or `app_metadata.role`
/// equals the configured role.
#[derive(Debug, Clone, Default)]
pub struct AllowListPolicy {
    ids: HashSet<Uuid>,
    role: Option<String>,
}

impl AllowListPolicy {
    pub fn new(ids: impl IntoIterator<Item = Uuid>, role: Option<String>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            role: role.filter(|r| !r.is_empty()),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.admin_user_ids.iter().copied(), config.admin_role.clone())
    }
}

impl AdminPolicy for AllowListPolicy {
    fn is_admin(&self, user: &AuthUser) -> bool {
        if self.ids.contains(&user.id) {
            return true;
        }
        match (&self.role, user.app_role()) {
            (Some(required), Some(actual)) => required == actual,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser::new(Uuid::new_v4(), "someone@example.com")
    }

    #[test]
    fn test_allow_list() {
        let admin = user();
        let policy = AllowListPolicy::new([admin.id], None);
        assert!(policy.is_admin(&admin));
        assert!(!policy.is_admin(&user()));
    }

    #[test]
    fn test_role_claim() {
        let policy = AllowListPolicy::new([], Some("admin".into()));
        assert!(policy.is_admin(&user().with_app_role("admin")));
        assert!(!policy.is_admin(&user().with_app_role("vendor")));
        assert!(!policy.is_admin(&user()));
    }

    #[test]
    fn test_empty_role_never_matches() {
        let policy = AllowListPolicy::new([], Some(String::new()));
        assert!(!policy.is_admin(&user().with_app_role("")));
    }
}

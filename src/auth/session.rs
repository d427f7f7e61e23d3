//! Session flags kept in local storage.

use crate::auth::types::{AuthResult, UserSession};
use crate::storage::{LocalStore, IS_AUTHENTICATED_KEY, USER_SESSION_KEY};

#[derive(Clone, Debug)]
pub struct SessionManager {
    store: LocalStore,
}

impl SessionManager {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get::<String>(IS_AUTHENTICATED_KEY).as_deref() == Some("true")
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.store.get(USER_SESSION_KEY)
    }

    pub fn set_user_session(&self, session: &UserSession) -> AuthResult<()> {
        self.store.set(USER_SESSION_KEY, session)?;
        self.store.set(IS_AUTHENTICATED_KEY, &"true")?;
        tracing::info!(role = %session.role, "Session started");
        Ok(())
    }

    pub fn clear_session(&self) -> AuthResult<()> {
        self.store.remove(USER_SESSION_KEY)?;
        self.store.remove(IS_AUTHENTICATED_KEY)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn user_role(&self) -> Option<String> {
        self.current_user().map(|s| s.role)
    }

    /// Exact match against the session's role.
    pub fn has_role(&self, role: &str) -> bool {
        self.user_role().as_deref() == Some(role)
    }
}

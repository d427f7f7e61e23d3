//! Test-credential login for the admin and inspector consoles.

use chrono::Utc;

use crate::auth::types::{AuthError, AuthResult, UserSession};
use crate::config::AuthConfig;

/// Check `id`/`password` against the configured consoles.
pub fn login(config: &AuthConfig, id: &str, password: &str) -> AuthResult<UserSession> {
    let role = if id == config.admin_id && password == config.admin_password {
        "admin"
    } else if id == config.inspector_id && password == config.inspector_password {
        "inspector"
    } else {
        tracing::warn!(id, "Rejected console login");
        return Err(AuthError::InvalidCredentials);
    };

    Ok(UserSession {
        id: Some(id.to_string()),
        address: None,
        role: role.to_string(),
        user_id: None,
        timestamp: Utc::now(),
        profile: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials() {
        let config = AuthConfig::default();
        assert_eq!(login(&config, "admin", "admin123").unwrap().role, "admin");
        assert_eq!(login(&config, "inspector", "insp123").unwrap().role, "inspector");
    }

    #[test]
    fn test_wrong_password() {
        let config = AuthConfig::default();
        assert!(matches!(
            login(&config, "admin", "insp123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(login(&config, "", "").is_err());
    }
}

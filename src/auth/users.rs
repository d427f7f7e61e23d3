//! Registered-customer directory used by the admin console.

use crate::auth::types::{AuthError, AuthResult, RegisteredUser, UserStatus};
use crate::storage::{LocalStore, REGISTERED_USERS_KEY};

#[derive(Clone, Debug)]
pub struct UserDirectory {
    store: LocalStore,
}

impl UserDirectory {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<RegisteredUser> {
        self.store.get(REGISTERED_USERS_KEY).unwrap_or_default()
    }

    pub fn add(&self, user: RegisteredUser) -> AuthResult<()> {
        let mut users = self.list();
        users.push(user);
        self.store.set(REGISTERED_USERS_KEY, &users)?;
        Ok(())
    }

    pub fn update_status(&self, index: usize, status: UserStatus) -> AuthResult<RegisteredUser> {
        let mut users = self.list();
        let user = users.get_mut(index).ok_or(AuthError::UserNotFound(index))?;
        user.status = status;
        let updated = user.clone();
        self.store.set(REGISTERED_USERS_KEY, &users)?;
        tracing::info!(user = %updated.name, status = %status, "User status updated");
        Ok(updated)
    }

    /// Replace the directory with three demo customers.
    pub fn seed_demo_users(&self) -> AuthResult<Vec<RegisteredUser>> {
        let users = demo_users();
        self.store.set(REGISTERED_USERS_KEY, &users)?;
        Ok(users)
    }
}

fn demo_users() -> Vec<RegisteredUser> {
    const SAMPLE_PDF: &str = "https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf";
    const SAMPLE_IMAGE: &str = "https://via.placeholder.com/150";

    let user = |name: &str, email: &str, wallet: &str, role: &str, status, files: bool| RegisteredUser {
        name: name.to_string(),
        email: email.to_string(),
        wallet: wallet.to_string(),
        role: role.to_string(),
        status,
        aadhaar_file: if files { SAMPLE_PDF.to_string() } else { String::new() },
        pan_file: if files { SAMPLE_IMAGE.to_string() } else { String::new() },
        registered_at: None,
    };

    vec![
        user("Darshan Patel", "darshan@example.com", "0x1234567890abcdef", "Buyer", UserStatus::Pending, true),
        user("Milan Shah", "milan@example.com", "0xabcdef1234567890", "Seller", UserStatus::Verified, true),
        user("Riya Mehta", "riya@example.com", "0xfedcba0987654321", "Seller", UserStatus::Rejected, false),
    ]
}

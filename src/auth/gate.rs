//! Page-level role gate.
//!
//! A page is reachable when a wallet is connected and the role the contract
//! reports for that wallet appears in the page's permission list.

use std::fmt;

use alloy::primitives::Address;
use serde::Serialize;

use crate::blockchain::LandLedger;

/// Gated pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    RegisterLand,
    Admin,
    Buyer,
    LandOwner,
    Seller,
    Inspector,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::RegisterLand => "register-land",
            Page::Admin => "admin",
            Page::Buyer => "buyer",
            Page::LandOwner => "landowner",
            Page::Seller => "seller",
            Page::Inspector => "inspector",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ADMIN_ROLES: &[&str] = &["Admin", "admin"];
const BUYER_ROLES: &[&str] = &["User", "Buyer", "buyer"];
const LANDOWNER_ROLES: &[&str] = &["User", "LandOwner", "landowner", "owner"];
const SELLER_ROLES: &[&str] = &["User", "Seller", "seller", "LandOwner"];
const INSPECTOR_ROLES: &[&str] = &["Inspector", "inspector", "LandInspector", "Admin", "admin"];
const ANY_ROLE: &[&str] = &[
    "Admin",
    "admin",
    "User",
    "Buyer",
    "buyer",
    "LandOwner",
    "landowner",
    "owner",
    "Seller",
    "seller",
    "Inspector",
    "inspector",
    "LandInspector",
];

/// Roles allowed on `page`.
pub fn permitted_roles(page: Page) -> &'static [&'static str] {
    match page {
        Page::Admin => ADMIN_ROLES,
        Page::Buyer => BUYER_ROLES,
        Page::LandOwner => LANDOWNER_ROLES,
        Page::Seller => SELLER_ROLES,
        Page::Inspector => INSPECTOR_ROLES,
        Page::Dashboard | Page::RegisterLand => ANY_ROLE,
    }
}

/// Gate decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    NoWallet,
    Denied { role: String, required: Page },
}

/// Decide access for a caller whose contract role is `role` (`None` when no wallet is connected).
pub fn check_access(page: Page, role: Option<&str>) -> Access {
    match role {
        None => Access::NoWallet,
        Some(role) if permitted_roles(page).contains(&role) => Access::Granted,
        Some(role) => Access::Denied {
            role: role.to_string(),
            required: page,
        },
    }
}

/// The contract's role for `account`. When the lookup fails the contract
/// admin is treated as `Admin` and everyone else as `User`.
pub async fn resolve_role(ledger: &dyn LandLedger, account: Address) -> String {
    match ledger.user_role(account).await {
        Ok(role) if !role.is_empty() => role,
        Ok(_) => "User".to_string(),
        Err(e) => {
            tracing::warn!(account = %account, error = %e, "Role lookup failed, using default role");
            match ledger.admin().await {
                Ok(admin) if admin == account => "Admin".to_string(),
                _ => "User".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_wallet() {
        assert_eq!(check_access(Page::Admin, None), Access::NoWallet);
        assert_eq!(check_access(Page::Dashboard, None), Access::NoWallet);
    }

    #[test]
    fn test_role_table() {
        assert_eq!(check_access(Page::Admin, Some("admin")), Access::Granted);
        assert_eq!(check_access(Page::Buyer, Some("User")), Access::Granted);
        assert_eq!(check_access(Page::LandOwner, Some("owner")), Access::Granted);
        assert_eq!(check_access(Page::Seller, Some("LandOwner")), Access::Granted);
        assert_eq!(check_access(Page::Inspector, Some("Admin")), Access::Granted);
        assert_eq!(check_access(Page::RegisterLand, Some("buyer")), Access::Granted);
    }

    #[test]
    fn test_denied_reports_role_and_page() {
        assert_eq!(
            check_access(Page::Admin, Some("User")),
            Access::Denied {
                role: "User".to_string(),
                required: Page::Admin,
            }
        );
        assert!(matches!(
            check_access(Page::Inspector, Some("Buyer")),
            Access::Denied { .. }
        ));
        assert!(matches!(
            check_access(Page::Dashboard, Some("Stranger")),
            Access::Denied { .. }
        ));
    }
}

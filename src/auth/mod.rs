//! Authentication and access subsystem.
//!
//! # Data Flow
//! ```text
//! Console login (credentials.rs) ─┐
//! Customer registration ──────────┼─→ session.rs (userSession / isAuthenticated)
//!   (registration.rs → ipfs)      └─→ users.rs (registeredUsers)
//!
//! Wallet connect (wallet.rs) → contract role (gate.rs::resolve_role)
//!     → gate.rs::check_access(page, role) → Granted | NoWallet | Denied
//! ```
//!
//! # Design Decisions
//! - Page access follows the contract role of the connected wallet, not the
//!   session role; sessions only record who signed in through which form
//! - Console credentials are test values from configuration

pub mod credentials;
pub mod gate;
pub mod registration;
pub mod session;
pub mod types;
pub mod users;
pub mod wallet;

pub use gate::{check_access, permitted_roles, resolve_role, Access, Page};
pub use registration::{register_customer, CustomerRegistration};
pub use session::SessionManager;
pub use types::{AuthError, AuthResult, CustomerProfile, RegisteredUser, UserSession, UserStatus};
pub use users::UserDirectory;
pub use wallet::{ChainConnector, WalletConnector, WalletSession, WalletState};

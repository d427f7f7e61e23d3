//! Session, directory and error types for the auth subsystem.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::ipfs::IpfsError;
use crate::storage::StorageError;
use crate::validation::{summarize, FieldError};

/// The signed-in user, as kept under `userSession`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<CustomerProfile>,
}

/// Details captured by customer registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub full_name: String,
    pub email: String,
    pub contact: String,
    pub aadhaar: String,
    pub pan: String,
    #[serde(rename = "aadhaarCID")]
    pub aadhaar_cid: String,
    #[serde(rename = "panCID")]
    pub pan_cid: String,
}

/// Review state of a registered customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Pending,
    Verified,
    Rejected,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserStatus::Pending => "Pending",
            UserStatus::Verified => "Verified",
            UserStatus::Rejected => "Rejected",
        })
    }
}

impl FromStr for UserStatus {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(UserStatus::Pending),
            "verified" => Ok(UserStatus::Verified),
            "rejected" => Ok(UserStatus::Rejected),
            _ => Err(AuthError::InvalidStatus(s.to_string())),
        }
    }
}

/// An entry of the `registeredUsers` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub name: String,
    pub email: String,
    /// Free text: demo entries carry placeholder wallets.
    pub wallet: String,
    pub role: String,
    pub status: UserStatus,
    #[serde(default)]
    pub aadhaar_file: String,
    #[serde(default)]
    pub pan_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Please connect your wallet to continue")]
    WalletRequired,

    #[error("{}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("User {0} not found")]
    UserNotFound(usize),

    #[error("Unknown user status '{0}'")]
    InvalidStatus(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Ipfs(#[from] IpfsError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

pub type AuthResult<T> = Result<T, AuthError>;

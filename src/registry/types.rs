//! Land records and the inputs of land actions.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::ipfs::IpfsError;
use crate::validation::{summarize, FieldError};

/// Zoning category of a parcel. Kept in the pinned metadata, not on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandType {
    Residential,
    Commercial,
    Agricultural,
    Industrial,
}

impl LandType {
    pub const ALL: [LandType; 4] = [
        LandType::Residential,
        LandType::Commercial,
        LandType::Agricultural,
        LandType::Industrial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandType::Residential => "Residential",
            LandType::Commercial => "Commercial",
            LandType::Agricultural => "Agricultural",
            LandType::Industrial => "Industrial",
        }
    }
}

impl fmt::Display for LandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LandType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown land type '{}'", s))
    }
}

/// A parcel as recorded by the registry contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandRecord {
    pub id: u64,
    pub owner: Address,
    pub location: String,
    /// CID of the pinned metadata document, empty when none was attached.
    #[serde(rename = "documentCID")]
    pub document_cid: String,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_type: Option<LandType>,
}

impl LandRecord {
    /// Unset mapping slots read back as a zero owner.
    pub fn exists(&self) -> bool {
        self.owner != Address::ZERO
    }

    pub fn is_owned_by(&self, account: Address) -> bool {
        self.owner == account
    }
}

/// Outcome of a successful land registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredLand {
    pub land_id: u64,
    pub tx_hash: TxHash,
    #[serde(rename = "documentCID")]
    pub document_cid: String,
}

/// Outcome of a successful transfer or verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandAction {
    pub land_id: u64,
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Errors of land actions. Display strings are shown to the user as-is.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Cannot transfer land to yourself")]
    SelfTransfer,

    #[error("Please select a valid land property")]
    LandNotOwned,

    #[error("Only verified properties can be transferred")]
    NotVerified,

    #[error("Land {0} not found")]
    NotFound(u64),

    #[error("No free land ID in 1..={0}")]
    RegistryFull(u64),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Ipfs(#[from] IpfsError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_land_type_parsing() {
        assert_eq!("residential".parse::<LandType>().unwrap(), LandType::Residential);
        assert_eq!(" Industrial ".parse::<LandType>().unwrap(), LandType::Industrial);
        assert!("Swamp".parse::<LandType>().is_err());
    }

    #[test]
    fn test_record_serializes_with_front_end_field_names() {
        let record = LandRecord {
            id: 7,
            owner: Address::ZERO,
            location: "Downtown Plot A".to_string(),
            document_cid: "bafy".to_string(),
            is_verified: true,
            area: None,
            land_type: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["documentCID"], "bafy");
        assert_eq!(json["isVerified"], true);
        assert!(json.get("area").is_none());
        assert!(!record.exists());
    }
}

//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Chain ID of a local Hardhat or Anvil node.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed after {0} blocks")]
    ConfirmationTimeout(u32),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// The caller does not own the land it tried to act on.
    #[error("You are not the owner of this land")]
    NotOwner,

    /// The signer declined the transaction.
    #[error("Transaction was cancelled")]
    Cancelled,

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Contract artifact missing or malformed.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Blockchain client not initialized or contract not configured.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

impl BlockchainError {
    /// Classify a failed contract call from its error text.
    ///
    /// Providers only surface revert reasons as text, so the two outcomes the
    /// UI distinguishes are recognised by substring.
    pub fn from_call(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if message.contains("Not the land owner") {
            BlockchainError::NotOwner
        } else if lowered.contains("user rejected") || lowered.contains("user denied") {
            BlockchainError::Cancelled
        } else if lowered.contains("revert") {
            BlockchainError::Reverted(message)
        } else {
            BlockchainError::Rpc(message)
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction failed or was dropped.
    Failed(String),
}

/// A confirmed state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Result of a contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: Address,
    pub admin: Address,
    pub tx_hash: TxHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_default_config() {
        let config = BlockchainConfig::default();
        assert_eq!(config.chain_id, LOCAL_CHAIN_ID);
        assert_eq!(config.rpc_timeout_secs, 10);
        assert_eq!(config.confirmation_blocks, 1);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::GasPriceTooHigh {
            current_gwei: 600,
            max_gwei: 500,
        };
        assert!(err.to_string().contains("600"));
    }

    #[test]
    fn test_call_error_classification() {
        assert!(matches!(
            BlockchainError::from_call("execution reverted: Not the land owner"),
            BlockchainError::NotOwner
        ));
        assert!(matches!(
            BlockchainError::from_call("MetaMask Tx Signature: User rejected the request"),
            BlockchainError::Cancelled
        ));
        assert!(matches!(
            BlockchainError::from_call("execution reverted: Land already verified"),
            BlockchainError::Reverted(_)
        ));
        assert!(matches!(
            BlockchainError::from_call("connection refused"),
            BlockchainError::Rpc(_)
        ));
    }
}

//! Contract deployment from a compiled artifact.
//!
//! The artifact is the Hardhat JSON output (`abi`, `bytecode`, plus whatever
//! else the compiler wrote). After deployment the same document is written
//! back with an `address` field so the gateway can find the contract.

use std::fs;
use std::path::Path;

use alloy::network::TransactionBuilder;
use alloy::primitives::{hex, Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use serde::{Deserialize, Serialize};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::{LandLedger, LandRegistryContract};
use crate::blockchain::transaction::{confirm, signing_provider};
use crate::blockchain::types::{BlockchainError, BlockchainResult, Deployment};
use crate::blockchain::wallet::Wallet;

/// A compiled contract artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractArtifact {
    pub abi: serde_json::Value,
    #[serde(default)]
    pub bytecode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Remaining compiler output, preserved on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> BlockchainResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BlockchainError::Artifact(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            BlockchainError::Artifact(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Write the artifact to `path` with the deployed address recorded.
    pub fn save_with_address(&self, path: &Path, address: Address) -> BlockchainResult<()> {
        let mut updated = self.clone();
        updated.address = Some(address.to_string());
        let json = serde_json::to_string_pretty(&updated)
            .map_err(|e| BlockchainError::Artifact(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                BlockchainError::Artifact(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(path, json).map_err(|e| {
            BlockchainError::Artifact(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Creation bytecode, decoded from hex.
    pub fn creation_code(&self) -> BlockchainResult<Bytes> {
        let raw = self.bytecode.trim();
        if raw.is_empty() || raw == "0x" {
            return Err(BlockchainError::Artifact("artifact has no bytecode".to_string()));
        }
        hex::decode(raw)
            .map(Bytes::from)
            .map_err(|e| BlockchainError::Artifact(format!("invalid bytecode: {}", e)))
    }
}

/// Deploy the registry and read back its admin.
pub async fn deploy(
    client: &BlockchainClient,
    wallet: &Wallet,
    artifact: &ContractArtifact,
) -> BlockchainResult<Deployment> {
    let code = artifact.creation_code()?;
    let provider = signing_provider(&client.config().rpc_url, wallet)?;

    let tx = TransactionRequest::default()
        .with_from(wallet.address())
        .with_deploy_code(code);
    let pending = provider
        .send_transaction(tx)
        .await
        .map_err(|e| BlockchainError::from_call(e.to_string()))?;
    let tx_hash = *pending.tx_hash();
    tracing::info!(tx_hash = %tx_hash, deployer = %wallet.address(), "Deployment submitted");

    confirm(client, tx_hash, client.config().tx_timeout_secs).await?;

    let receipt = client
        .get_transaction_receipt(tx_hash)
        .await?
        .ok_or_else(|| BlockchainError::Rpc(format!("receipt for {} disappeared", tx_hash)))?;
    let address = receipt
        .contract_address
        .ok_or_else(|| BlockchainError::Reverted("deployment produced no contract".to_string()))?;

    let contract = LandRegistryContract::new(client.clone(), wallet, address)?;
    let admin = contract.admin().await?;

    tracing::info!(address = %address, admin = %admin, "LandRegistry deployed");
    Ok(Deployment {
        address,
        admin,
        tx_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "LandRegistry",
        "abi": [],
        "bytecode": "0x6080604052"
    }"#;

    #[test]
    fn test_artifact_round_trip_preserves_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("LandRegistry.json");
        fs::write(&source, ARTIFACT).unwrap();

        let artifact = ContractArtifact::load(&source).unwrap();
        assert_eq!(artifact.creation_code().unwrap().len(), 5);

        let target = dir.path().join("out/LandRegistry.json");
        artifact
            .save_with_address(&target, Address::repeat_byte(0xab))
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(written["contractName"], "LandRegistry");
        assert_eq!(
            written["address"].as_str().unwrap().to_lowercase(),
            format!("0x{}", "ab".repeat(20))
        );
    }

    #[test]
    fn test_missing_bytecode() {
        let artifact: ContractArtifact = serde_json::from_str(r#"{"abi": []}"#).unwrap();
        assert!(artifact.creation_code().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ContractArtifact::load(Path::new("/nonexistent/LandRegistry.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}

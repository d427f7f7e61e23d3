//! LandRegistry contract bindings and the call facade.
//!
//! Every state-changing call is submitted, then awaited until confirmed.
//! Failures are classified once (see [`BlockchainError::from_call`]) and
//! returned to the caller; nothing is retried.

use std::future::IntoFuture;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use alloy::sol;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{confirm, signing_provider};
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxOutcome};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;
use crate::registry::types::LandRecord;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    interface LandRegistry {
        event LandRegistered(uint256 indexed landId, address indexed owner, string location);
        event LandTransferred(uint256 indexed landId, address indexed from, address indexed to);
        event LandVerified(uint256 indexed landId);

        function admin() external view returns (address);
        function getLand(uint256 landId) external view returns (uint256 id, address owner, string location, string documentCID, bool isVerified);
        function getUserRole(address user) external view returns (string);
        function registerLand(uint256 landId, address owner, string location, string documentCID) external;
        function transferLand(uint256 landId, address newOwner) external;
        function verifyLand(uint256 landId) external;
    }
}

/// The contract operations the rest of the crate relies on.
#[async_trait]
pub trait LandLedger: Send + Sync {
    /// Account that signs state-changing calls.
    fn account(&self) -> Address;

    async fn get_land(&self, land_id: u64) -> BlockchainResult<LandRecord>;

    async fn register_land(
        &self,
        land_id: u64,
        owner: Address,
        location: &str,
        document_cid: &str,
    ) -> BlockchainResult<TxOutcome>;

    async fn transfer_land(&self, land_id: u64, new_owner: Address) -> BlockchainResult<TxOutcome>;

    async fn verify_land(&self, land_id: u64) -> BlockchainResult<TxOutcome>;

    /// Role string the contract assigns to `account`.
    async fn user_role(&self, account: Address) -> BlockchainResult<String>;

    async fn admin(&self) -> BlockchainResult<Address>;
}

/// [`LandLedger`] backed by a deployed LandRegistry contract.
pub struct LandRegistryContract {
    instance: LandRegistry::LandRegistryInstance<DynProvider>,
    client: BlockchainClient,
    account: Address,
    call_timeout: Duration,
}

impl LandRegistryContract {
    /// Bind to the contract at `address`, signing with `wallet`.
    pub fn new(client: BlockchainClient, wallet: &Wallet, address: Address) -> BlockchainResult<Self> {
        let provider = signing_provider(&client.config().rpc_url, wallet)?;
        let call_timeout = Duration::from_secs(client.config().rpc_timeout_secs);
        Ok(Self {
            instance: LandRegistry::new(address, provider),
            client,
            account: wallet.address(),
            call_timeout,
        })
    }

    /// Bind to the contract address named in the client's configuration.
    pub fn from_config(client: BlockchainClient, wallet: &Wallet) -> BlockchainResult<Self> {
        let address = configured_address(&client.config().contract_address)?;
        Self::new(client, wallet, address)
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn confirm_submitted(&self, method: &'static str, tx_hash: TxHash) -> BlockchainResult<TxOutcome> {
        tracing::info!(method, tx_hash = %tx_hash, "Transaction submitted");
        let result = confirm(&self.client, tx_hash, self.client.config().tx_timeout_secs).await;
        metrics::record_contract_call(method, result.is_ok());
        match &result {
            Ok(outcome) => {
                tracing::info!(method, tx_hash = %tx_hash, block = outcome.block_number, "Transaction confirmed")
            }
            Err(e) => tracing::error!(method, tx_hash = %tx_hash, error = %e, "Transaction failed"),
        }
        result
    }

    fn submit_failed(&self, method: &'static str, error: alloy::contract::Error) -> BlockchainError {
        metrics::record_contract_call(method, false);
        let error = BlockchainError::from_call(error.to_string());
        tracing::error!(method, error = %error, "Contract call rejected");
        error
    }
}

/// Parse the configured contract address.
pub fn configured_address(raw: &str) -> BlockchainResult<Address> {
    if raw.is_empty() {
        return Err(BlockchainError::NotAvailable(
            "no contract address configured; deploy the contract first".to_string(),
        ));
    }
    raw.parse()
        .map_err(|e| BlockchainError::NotAvailable(format!("invalid contract address '{}': {}", raw, e)))
}

#[async_trait]
impl LandLedger for LandRegistryContract {
    fn account(&self) -> Address {
        self.account
    }

    async fn get_land(&self, land_id: u64) -> BlockchainResult<LandRecord> {
        let call = self.instance.getLand(U256::from(land_id));
        let land = timeout(self.call_timeout, call.call().into_future())
            .await
            .map_err(|_| BlockchainError::Timeout(self.call_timeout.as_secs()))?
            .map_err(|e| BlockchainError::from_call(e.to_string()))?;

        Ok(LandRecord {
            id: land.id.saturating_to::<u64>(),
            owner: land.owner,
            location: land.location,
            document_cid: land.documentCID,
            is_verified: land.isVerified,
            area: None,
            land_type: None,
        })
    }

    async fn register_land(
        &self,
        land_id: u64,
        owner: Address,
        location: &str,
        document_cid: &str,
    ) -> BlockchainResult<TxOutcome> {
        let pending = self
            .instance
            .registerLand(
                U256::from(land_id),
                owner,
                location.to_string(),
                document_cid.to_string(),
            )
            .send()
            .await
            .map_err(|e| self.submit_failed("registerLand", e))?;
        self.confirm_submitted("registerLand", *pending.tx_hash()).await
    }

    async fn transfer_land(&self, land_id: u64, new_owner: Address) -> BlockchainResult<TxOutcome> {
        let pending = self
            .instance
            .transferLand(U256::from(land_id), new_owner)
            .send()
            .await
            .map_err(|e| self.submit_failed("transferLand", e))?;
        self.confirm_submitted("transferLand", *pending.tx_hash()).await
    }

    async fn verify_land(&self, land_id: u64) -> BlockchainResult<TxOutcome> {
        let pending = self
            .instance
            .verifyLand(U256::from(land_id))
            .send()
            .await
            .map_err(|e| self.submit_failed("verifyLand", e))?;
        self.confirm_submitted("verifyLand", *pending.tx_hash()).await
    }

    async fn user_role(&self, account: Address) -> BlockchainResult<String> {
        let call = self.instance.getUserRole(account);
        timeout(self.call_timeout, call.call().into_future())
            .await
            .map_err(|_| BlockchainError::Timeout(self.call_timeout.as_secs()))?
            .map_err(|e| BlockchainError::from_call(e.to_string()))
    }

    async fn admin(&self) -> BlockchainResult<Address> {
        let call = self.instance.admin();
        timeout(self.call_timeout, call.call().into_future())
            .await
            .map_err(|_| BlockchainError::Timeout(self.call_timeout.as_secs()))?
            .map_err(|e| BlockchainError::from_call(e.to_string()))
    }
}

//! Connected-wallet state.
//!
//! # Responsibilities
//! - Hold the connected account and its contract handle
//! - Persist the `walletConnected` flag so the gateway reconnects on restart
//!
//! # Design Decisions
//! - Lock-free reads via `ArcSwapOption`; connect/disconnect swap the whole session
//! - Connecting is behind `WalletConnector` so tests substitute an in-memory ledger

use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;

use crate::auth::types::AuthResult;
use crate::blockchain::{BlockchainClient, BlockchainResult, LandLedger, LandRegistryContract, Wallet};
use crate::storage::{LocalStore, WALLET_CONNECTED_KEY};

/// A connected account.
#[derive(Clone)]
pub struct WalletSession {
    pub account: Address,
    pub chain_id: u64,
    pub ledger: Arc<dyn LandLedger>,
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Produces wallet sessions.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Connect the environment key, or development account `dev_account` when given.
    async fn connect(&self, dev_account: Option<usize>) -> BlockchainResult<WalletSession>;
}

/// Connector that signs with a local key against the configured contract.
pub struct ChainConnector {
    client: BlockchainClient,
}

impl ChainConnector {
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WalletConnector for ChainConnector {
    async fn connect(&self, dev_account: Option<usize>) -> BlockchainResult<WalletSession> {
        let chain_id = self.client.config().chain_id;
        let wallet = match dev_account {
            Some(index) => Wallet::dev_account(index, chain_id)?,
            None => Wallet::from_env(chain_id)?,
        };
        let contract = LandRegistryContract::from_config(self.client.clone(), &wallet)?;
        Ok(WalletSession {
            account: wallet.address(),
            chain_id,
            ledger: Arc::new(contract),
        })
    }
}

/// Shared wallet slot.
#[derive(Clone)]
pub struct WalletState {
    current: Arc<ArcSwapOption<WalletSession>>,
    store: LocalStore,
}

impl WalletState {
    pub fn new(store: LocalStore) -> Self {
        Self {
            current: Arc::new(ArcSwapOption::empty()),
            store,
        }
    }

    pub fn current(&self) -> Option<Arc<WalletSession>> {
        self.current.load_full()
    }

    pub fn is_connected(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.current().map(|s| s.account)
    }

    /// Whether the previous run left a wallet connected.
    pub fn was_connected(&self) -> bool {
        self.store.get::<String>(WALLET_CONNECTED_KEY).as_deref() == Some("true")
    }

    pub async fn connect(
        &self,
        connector: &dyn WalletConnector,
        dev_account: Option<usize>,
    ) -> AuthResult<Arc<WalletSession>> {
        let session = Arc::new(connector.connect(dev_account).await?);
        self.current.store(Some(session.clone()));
        self.store.set(WALLET_CONNECTED_KEY, &"true")?;
        tracing::info!(account = %session.account, chain_id = session.chain_id, "Wallet connected");
        Ok(session)
    }

    pub fn disconnect(&self) -> AuthResult<()> {
        self.current.store(None);
        self.store.remove(WALLET_CONNECTED_KEY)?;
        tracing::info!("Wallet disconnected");
        Ok(())
    }
}

impl std::fmt::Debug for WalletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletState")
            .field("account", &self.account())
            .finish()
    }
}

//! Transaction submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Build a signing provider for a wallet
//! - Send plain value transfers (test-account funding)
//! - Monitor confirmations for any submitted transaction

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus, TxOutcome};
use crate::blockchain::wallet::Wallet;

/// Build a provider that signs with `wallet` and fills nonce, gas and chain ID.
pub fn signing_provider(rpc_url: &str, wallet: &Wallet) -> BlockchainResult<DynProvider> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
    Ok(ProviderBuilder::new()
        .wallet(wallet.ethereum_wallet())
        .connect_http(url)
        .erased())
}

/// Sends transactions from one wallet and waits for them to confirm.
pub struct TxSender {
    client: BlockchainClient,
    provider: DynProvider,
    wallet: Wallet,
}

impl TxSender {
    /// Create a sender for `wallet` on the client's primary RPC endpoint.
    pub fn new(client: BlockchainClient, wallet: Wallet) -> BlockchainResult<Self> {
        let provider = signing_provider(&client.config().rpc_url, &wallet)?;
        Ok(Self {
            client,
            provider,
            wallet,
        })
    }

    /// Send `value` wei to `to` and wait for confirmation.
    pub async fn send_value(&self, to: Address, value: U256) -> BlockchainResult<TxOutcome> {
        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;
        let max_gwei = self.client.config().max_gas_price_gwei;
        if gas_price_gwei > max_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei,
            });
        }

        let tx = TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_to(to)
            .with_value(value);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| BlockchainError::from_call(e.to_string()))?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(tx_hash = %tx_hash, to = %to, value = %value, "Value transfer submitted");

        let timeout_secs = self.client.config().tx_timeout_secs;
        confirm(&self.client, tx_hash, timeout_secs).await
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

/// Wait until `tx_hash` is confirmed, turning any other outcome into an error.
pub async fn confirm(
    client: &BlockchainClient,
    tx_hash: TxHash,
    timeout_secs: u64,
) -> BlockchainResult<TxOutcome> {
    match wait_for_confirmation(client, tx_hash, timeout_secs).await? {
        ConfirmationStatus::Confirmed { block_number } => Ok(TxOutcome {
            tx_hash,
            block_number,
        }),
        ConfirmationStatus::Failed(reason) => Err(BlockchainError::Reverted(reason)),
    }
}

/// Wait for a transaction to be confirmed.
///
/// # Arguments
/// * `tx_hash` - Transaction hash to monitor
/// * `timeout_secs` - Maximum time to wait for confirmation
pub async fn wait_for_confirmation(
    client: &BlockchainClient,
    tx_hash: TxHash,
    timeout_secs: u64,
) -> BlockchainResult<ConfirmationStatus> {
    let required_confirmations = client.confirmation_blocks();
    let timeout_duration = Duration::from_secs(timeout_secs);

    match timeout(timeout_duration, poll_receipt(client, tx_hash, required_confirmations)).await {
        Ok(status) => status,
        Err(_) => Err(BlockchainError::ConfirmationTimeout(required_confirmations)),
    }
}

async fn poll_receipt(
    client: &BlockchainClient,
    tx_hash: TxHash,
    required_confirmations: u32,
) -> BlockchainResult<ConfirmationStatus> {
    let mut ticker = interval(Duration::from_secs(1));

    loop {
        ticker.tick().await;

        // The transaction is already submitted; a failed poll is retried until the timeout.
        let receipt = match client.get_transaction_receipt(tx_hash).await {
            Ok(Some(r)) => r,
            Ok(None) => {
                tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                continue;
            }
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                continue;
            }
        };

        if !receipt.status() {
            return Ok(ConfirmationStatus::Failed(format!(
                "Transaction {} reverted",
                tx_hash
            )));
        }

        let current_block = match client.get_block_number().await {
            Ok(block) => block,
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, error = %e, "Block number poll failed");
                continue;
            }
        };
        let tx_block = receipt.block_number.unwrap_or(current_block);
        // The inclusion block counts as the first confirmation.
        let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

        if confirmations >= required_confirmations {
            return Ok(ConfirmationStatus::Confirmed {
                block_number: tx_block,
            });
        }

        tracing::debug!(
            tx_hash = %tx_hash,
            confirmations = confirmations,
            required = required_confirmations,
            "Waiting for confirmations"
        );
    }
}

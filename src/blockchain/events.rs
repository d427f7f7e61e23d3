//! Contract event monitoring.
//!
//! Polls the registry's logs and rebroadcasts decoded events to every
//! subscriber (the gateway's WebSocket clients).

use std::time::Duration;

use alloy::primitives::Address;
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::LandRegistry;
use crate::blockchain::types::BlockchainResult;

/// A registry event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum LandEvent {
    #[serde(rename_all = "camelCase")]
    LandRegistered {
        land_id: u64,
        owner: Address,
        location: String,
        block_number: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    LandTransferred {
        land_id: u64,
        from: Address,
        to: Address,
        block_number: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    LandVerified {
        land_id: u64,
        block_number: Option<u64>,
    },
}

/// Decode a registry log, ignoring anything that is not a registry event.
pub fn decode_log(log: &Log) -> Option<LandEvent> {
    let block_number = log.block_number;
    if let Ok(decoded) = log.log_decode::<LandRegistry::LandRegistered>() {
        let event = decoded.inner.data;
        return Some(LandEvent::LandRegistered {
            land_id: event.landId.saturating_to(),
            owner: event.owner,
            location: event.location,
            block_number,
        });
    }
    if let Ok(decoded) = log.log_decode::<LandRegistry::LandTransferred>() {
        let event = decoded.inner.data;
        return Some(LandEvent::LandTransferred {
            land_id: event.landId.saturating_to(),
            from: event.from,
            to: event.to,
            block_number,
        });
    }
    if let Ok(decoded) = log.log_decode::<LandRegistry::LandVerified>() {
        return Some(LandEvent::LandVerified {
            land_id: decoded.inner.data.landId.saturating_to(),
            block_number,
        });
    }
    None
}

/// Background task that polls registry logs.
pub struct EventWatcher {
    client: BlockchainClient,
    contract_address: Address,
    /// Last block already scanned; unset until the node first answers.
    last_block: Option<u64>,
    poll_interval: Duration,
    events: broadcast::Sender<LandEvent>,
}

impl EventWatcher {
    pub fn new(
        client: BlockchainClient,
        contract_address: Address,
        events: broadcast::Sender<LandEvent>,
    ) -> Self {
        let poll_interval = Duration::from_millis(client.config().event_poll_interval_ms);
        Self {
            client,
            contract_address,
            last_block: None,
            poll_interval,
            events,
        }
    }

    /// Run the poll loop until the shutdown signal fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(contract = %self.contract_address, "Starting registry event watcher");

        if let Ok(block) = self.client.get_block_number().await {
            self.last_block = Some(block);
            tracing::info!(block, "Event watcher starting at current block");
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Event watcher stopped");
                    return;
                }
                _ = sleep(self.poll_interval) => {
                    if let Err(e) = self.poll_events().await {
                        tracing::warn!(error = %e, "Error polling registry events");
                    }
                }
            }
        }
    }

    async fn poll_events(&mut self) -> BlockchainResult<()> {
        let current_block = self.client.get_block_number().await?;
        let (range, last_block) = scan_range(self.last_block, current_block);
        self.last_block = Some(last_block);
        let Some((from, to)) = range else {
            return Ok(());
        };

        let filter = Filter::new()
            .address(self.contract_address)
            .from_block(from)
            .to_block(to)
            .event_signature(vec![
                LandRegistry::LandRegistered::SIGNATURE_HASH,
                LandRegistry::LandTransferred::SIGNATURE_HASH,
                LandRegistry::LandVerified::SIGNATURE_HASH,
            ]);

        let logs = self.client.get_logs(&filter).await?;
        for log in &logs {
            if let Some(event) = decode_log(log) {
                tracing::debug!(?event, "Registry event");
                // No subscribers is not an error.
                let _ = self.events.send(event);
            }
        }

        Ok(())
    }
}

/// Blocks to scan given the last scanned block and the chain head, plus the
/// new last block. The first observed head is a starting point, not history
/// to replay.
fn scan_range(last_block: Option<u64>, current_block: u64) -> (Option<(u64, u64)>, u64) {
    match last_block {
        None => {
            tracing::info!(block = current_block, "Event watcher starting at current block");
            (None, current_block)
        }
        Some(last) if current_block <= last => (None, last),
        Some(last) => (Some((last + 1, current_block)), current_block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn rpc_log<E: SolEvent>(event: &E, block: u64) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0x42),
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_transfer() {
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        let log = rpc_log(
            &LandRegistry::LandTransferred {
                landId: U256::from(9),
                from,
                to,
            },
            12,
        );
        assert_eq!(
            decode_log(&log),
            Some(LandEvent::LandTransferred {
                land_id: 9,
                from,
                to,
                block_number: Some(12),
            })
        );
    }

    #[test]
    fn test_decode_verified_serializes_tagged() {
        let log = rpc_log(&LandRegistry::LandVerified { landId: U256::from(3) }, 5);
        let event = decode_log(&log).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "LandVerified");
        assert_eq!(json["landId"], 3);
    }

    #[test]
    fn test_scan_starts_at_first_observed_head() {
        assert_eq!(scan_range(None, 5000), (None, 5000));
        assert_eq!(scan_range(Some(5000), 5000), (None, 5000));
        assert_eq!(scan_range(Some(5000), 5003), (Some((5001, 5003)), 5003));
        assert_eq!(scan_range(Some(5003), 5001), (None, 5003));
    }

    #[test]
    fn test_foreign_log_is_ignored() {
        let log = Log::default();
        assert_eq!(decode_log(&log), None);
    }
}

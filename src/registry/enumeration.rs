//! Land discovery by ID scan.
//!
//! The contract keeps no owner index, so lands are found by reading IDs
//! `1..=limit` one at a time. Failed reads and zero-owner slots are skipped.

use alloy::primitives::Address;

use crate::blockchain::LandLedger;
use crate::registry::types::LandRecord;

/// Every existing land in the scan range, in ID order.
pub async fn all_lands(ledger: &dyn LandLedger, limit: u64) -> Vec<LandRecord> {
    let mut lands = Vec::new();
    for id in 1..=limit {
        match ledger.get_land(id).await {
            Ok(land) if land.exists() => lands.push(land),
            Ok(_) => {}
            Err(e) => tracing::debug!(land_id = id, error = %e, "Skipping unreadable land"),
        }
    }
    lands
}

/// Lands in the scan range owned by `owner`.
pub async fn owned_lands(ledger: &dyn LandLedger, owner: Address, limit: u64) -> Vec<LandRecord> {
    let mut lands = all_lands(ledger, limit).await;
    lands.retain(|land| land.is_owned_by(owner));
    lands
}

/// The lowest ID in the scan range with no recorded owner.
pub async fn next_free_id(ledger: &dyn LandLedger, limit: u64) -> Option<u64> {
    for id in 1..=limit {
        match ledger.get_land(id).await {
            Ok(land) if land.exists() => continue,
            _ => return Some(id),
        }
    }
    None
}

//! Per-role dashboard views built from the land scan.

use alloy::primitives::Address;
use serde::Serialize;

use crate::registry::service::LandService;
use crate::registry::types::LandRecord;

/// Counts shown at the top of every dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LandSummary {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
}

impl LandSummary {
    pub fn of(lands: &[LandRecord]) -> Self {
        let verified = lands.iter().filter(|l| l.is_verified).count();
        Self {
            total: lands.len(),
            verified,
            pending: lands.len() - verified,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    pub account: Address,
    pub summary: LandSummary,
    pub lands: Vec<LandRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDashboard {
    pub account: Address,
    pub summary: LandSummary,
    pub lands: Vec<LandRecord>,
    /// Verified lands, the only ones that can be transferred.
    pub transferable: Vec<LandRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDashboard {
    pub account: Address,
    /// Verified lands owned by someone else.
    pub available: Vec<LandRecord>,
    pub owned: Vec<LandRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub summary: LandSummary,
    pub lands: Vec<LandRecord>,
    pub pending: Vec<LandRecord>,
    pub registered_users: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorDashboard {
    pub summary: LandSummary,
    pub pending: Vec<LandRecord>,
    pub completed: Vec<LandRecord>,
}

pub async fn owner_dashboard(lands: &LandService) -> OwnerDashboard {
    let owned = lands.owned().await;
    OwnerDashboard {
        account: lands.account(),
        summary: LandSummary::of(&owned),
        lands: owned,
    }
}

pub async fn seller_dashboard(lands: &LandService) -> SellerDashboard {
    let owned = lands.owned().await;
    SellerDashboard {
        account: lands.account(),
        summary: LandSummary::of(&owned),
        transferable: owned.iter().filter(|l| l.is_verified).cloned().collect(),
        lands: owned,
    }
}

pub async fn buyer_dashboard(lands: &LandService) -> BuyerDashboard {
    let account = lands.account();
    let (owned, available): (Vec<_>, Vec<_>) = lands
        .all()
        .await
        .into_iter()
        .partition(|l| l.is_owned_by(account));
    BuyerDashboard {
        account,
        available: available.into_iter().filter(|l| l.is_verified).collect(),
        owned,
    }
}

pub async fn admin_dashboard(lands: &LandService, registered_users: usize) -> AdminDashboard {
    let all = lands.all().await;
    AdminDashboard {
        summary: LandSummary::of(&all),
        pending: all.iter().filter(|l| !l.is_verified).cloned().collect(),
        lands: all,
        registered_users,
    }
}

pub async fn inspector_dashboard(lands: &LandService) -> InspectorDashboard {
    let all = lands.all().await;
    let summary = LandSummary::of(&all);
    let (completed, pending): (Vec<_>, Vec<_>) = all.into_iter().partition(|l| l.is_verified);
    InspectorDashboard {
        summary,
        pending,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IpfsConfig;
    use crate::ipfs::{UploadCache, UploadService};
    use crate::registry::test_ledger::{MemoryLedger, MemoryPins};
    use crate::storage::LocalStore;
    use std::sync::Arc;

    fn lands() -> LandService {
        let me = Address::repeat_byte(1);
        let other = Address::repeat_byte(2);
        let ledger = Arc::new(MemoryLedger::new(me));
        ledger.insert(1, me, "Mine verified", true);
        ledger.insert(2, me, "Mine pending", false);
        ledger.insert(3, other, "Theirs verified", true);
        ledger.insert(4, other, "Theirs pending", false);
        let uploads = UploadService::new(
            Arc::new(MemoryPins::default()),
            UploadCache::load(LocalStore::in_memory()),
            IpfsConfig::default(),
        );
        LandService::new(ledger, uploads, 10)
    }

    #[tokio::test]
    async fn test_owner_and_seller() {
        let lands = lands();
        let owner = owner_dashboard(&lands).await;
        assert_eq!(owner.summary, LandSummary { total: 2, verified: 1, pending: 1 });

        let seller = seller_dashboard(&lands).await;
        assert_eq!(seller.transferable.len(), 1);
        assert_eq!(seller.transferable[0].id, 1);
    }

    #[tokio::test]
    async fn test_buyer_sees_verified_lands_of_others() {
        let buyer = buyer_dashboard(&lands()).await;
        let available: Vec<u64> = buyer.available.iter().map(|l| l.id).collect();
        assert_eq!(available, vec![3]);
        assert_eq!(buyer.owned.len(), 2);
    }

    #[tokio::test]
    async fn test_admin_and_inspector() {
        let lands = lands();
        let admin = admin_dashboard(&lands, 3).await;
        assert_eq!(admin.summary.total, 4);
        assert_eq!(admin.pending.len(), 2);
        assert_eq!(admin.registered_users, 3);

        let inspector = inspector_dashboard(&lands).await;
        let pending: Vec<u64> = inspector.pending.iter().map(|l| l.id).collect();
        assert_eq!(pending, vec![2, 4]);
        assert_eq!(inspector.completed.len(), 2);
    }
}

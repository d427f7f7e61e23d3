//! In-memory ledger and pinning doubles for unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::blockchain::{BlockchainError, BlockchainResult, LandLedger, TxOutcome};
use crate::ipfs::{FileUpload, IpfsError, IpfsResult, PinMetadata, PinResponse, PinningService};
use crate::registry::types::LandRecord;

pub struct MemoryLedger {
    account: Address,
    lands: Mutex<BTreeMap<u64, LandRecord>>,
    unreadable: Mutex<HashSet<u64>>,
    txs: AtomicUsize,
}

impl MemoryLedger {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            lands: Mutex::new(BTreeMap::new()),
            unreadable: Mutex::new(HashSet::new()),
            txs: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, id: u64, owner: Address, location: &str, verified: bool) {
        self.lands.lock().insert(
            id,
            LandRecord {
                id,
                owner,
                location: location.to_string(),
                document_cid: String::new(),
                is_verified: verified,
                area: None,
                land_type: None,
            },
        );
    }

    pub fn fail_reads_of(&self, id: u64) {
        self.unreadable.lock().insert(id);
    }

    pub fn land(&self, id: u64) -> Option<LandRecord> {
        self.lands.lock().get(&id).cloned()
    }

    pub fn transactions(&self) -> usize {
        self.txs.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> TxOutcome {
        let n = self.txs.fetch_add(1, Ordering::SeqCst) + 1;
        TxOutcome {
            tx_hash: TxHash::from(B256::with_last_byte(n as u8)),
            block_number: n as u64,
        }
    }
}

#[async_trait]
impl LandLedger for MemoryLedger {
    fn account(&self) -> Address {
        self.account
    }

    async fn get_land(&self, land_id: u64) -> BlockchainResult<LandRecord> {
        if self.unreadable.lock().contains(&land_id) {
            return Err(BlockchainError::Rpc("read failed".to_string()));
        }
        Ok(self.land(land_id).unwrap_or(LandRecord {
            id: 0,
            owner: Address::ZERO,
            location: String::new(),
            document_cid: String::new(),
            is_verified: false,
            area: None,
            land_type: None,
        }))
    }

    async fn register_land(
        &self,
        land_id: u64,
        owner: Address,
        location: &str,
        document_cid: &str,
    ) -> BlockchainResult<TxOutcome> {
        self.insert(land_id, owner, location, false);
        if let Some(land) = self.lands.lock().get_mut(&land_id) {
            land.document_cid = document_cid.to_string();
        }
        Ok(self.outcome())
    }

    async fn transfer_land(&self, land_id: u64, new_owner: Address) -> BlockchainResult<TxOutcome> {
        {
            let mut lands = self.lands.lock();
            let land = lands.get_mut(&land_id).ok_or(BlockchainError::NotOwner)?;
            if land.owner != self.account {
                return Err(BlockchainError::NotOwner);
            }
            land.owner = new_owner;
        }
        Ok(self.outcome())
    }

    async fn verify_land(&self, land_id: u64) -> BlockchainResult<TxOutcome> {
        if let Some(land) = self.lands.lock().get_mut(&land_id) {
            land.is_verified = true;
        }
        Ok(self.outcome())
    }

    async fn user_role(&self, _account: Address) -> BlockchainResult<String> {
        Ok("User".to_string())
    }

    async fn admin(&self) -> BlockchainResult<Address> {
        Ok(self.account)
    }
}

#[derive(Default)]
pub struct MemoryPins {
    json: Mutex<BTreeMap<String, Value>>,
    files: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MemoryPins {
    pub fn json(&self, cid: &str) -> Option<Value> {
        self.json.lock().get(cid).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PinningService for MemoryPins {
    async fn pin_file(&self, file: &FileUpload, metadata: &PinMetadata) -> IpfsResult<PinResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.files.lock().push(metadata.name.clone());
        Ok(PinResponse {
            cid: format!("bafyfile{}", n),
            pin_size: file.size() as u64,
            timestamp: String::new(),
        })
    }

    async fn pin_json(&self, content: &Value, _metadata: &PinMetadata) -> IpfsResult<PinResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let cid = format!("bafyjson{}", n);
        self.json.lock().insert(cid.clone(), content.clone());
        Ok(PinResponse {
            cid,
            pin_size: 0,
            timestamp: String::new(),
        })
    }

    async fn fetch_json(&self, cid: &str) -> IpfsResult<Value> {
        self.json(cid).ok_or_else(|| IpfsError::Fetch {
            cid: cid.to_string(),
            reason: "not pinned".to_string(),
        })
    }

    async fn test_authentication(&self) -> IpfsResult<String> {
        Ok("Congratulations! You are communicating with the Pinata API!".to_string())
    }
}

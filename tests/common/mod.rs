//! Shared doubles for the gateway integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

use land_registry::auth::{WalletConnector, WalletSession};
use land_registry::blockchain::{BlockchainError, BlockchainResult, LandLedger, TxOutcome};
use land_registry::config::RegistryConfig;
use land_registry::http::build_router;
use land_registry::ipfs::{FileUpload, IpfsError, IpfsResult, PinMetadata, PinResponse, PinningService};
use land_registry::registry::LandRecord;
use land_registry::storage::LocalStore;
use land_registry::AppState;

pub const CHAIN_ID: u64 = 31337;

pub fn account(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Contract stand-in holding lands in memory.
pub struct MockLedger {
    account: Address,
    role: Mutex<String>,
    lands: Mutex<BTreeMap<u64, LandRecord>>,
    txs: AtomicUsize,
}

impl MockLedger {
    pub fn new(account: Address, role: &str) -> Arc<Self> {
        Arc::new(Self {
            account,
            role: Mutex::new(role.to_string()),
            lands: Mutex::new(BTreeMap::new()),
            txs: AtomicUsize::new(0),
        })
    }

    pub fn set_role(&self, role: &str) {
        *self.role.lock() = role.to_string();
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
impl LandLedger for MockLedger {
    fn account(&self) -> Address {
        self.account
    }

    async fn get_land(&self, land_id: u64) -> BlockchainResult<LandRecord> {
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
        Ok(self.role.lock().clone())
    }

    async fn admin(&self) -> BlockchainResult<Address> {
        Ok(Address::ZERO)
    }
}

/// Pinning service that hands out sequential CIDs.
#[derive(Default)]
pub struct MockPinning {
    json: Mutex<BTreeMap<String, Value>>,
    calls: AtomicUsize,
}

impl MockPinning {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PinningService for MockPinning {
    async fn pin_file(&self, file: &FileUpload, _metadata: &PinMetadata) -> IpfsResult<PinResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
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
        self.json.lock().get(cid).cloned().ok_or_else(|| IpfsError::Fetch {
            cid: cid.to_string(),
            reason: "not pinned".to_string(),
        })
    }

    async fn test_authentication(&self) -> IpfsResult<String> {
        Ok("authenticated".to_string())
    }
}

/// Connector that always yields the same ledger.
pub struct MockConnector {
    pub ledger: Arc<MockLedger>,
}

#[async_trait]
impl WalletConnector for MockConnector {
    async fn connect(&self, _dev_account: Option<usize>) -> BlockchainResult<WalletSession> {
        Ok(WalletSession {
            account: self.ledger.account(),
            chain_id: CHAIN_ID,
            ledger: self.ledger.clone(),
        })
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub ledger: Arc<MockLedger>,
    pub pinning: Arc<MockPinning>,
}

/// Gateway wired to in-memory doubles. The wallet starts disconnected.
pub fn test_app(role: &str) -> TestApp {
    let ledger = MockLedger::new(account(0xaa), role);
    let pinning = Arc::new(MockPinning::default());
    let connector = Arc::new(MockConnector { ledger: ledger.clone() });
    let state = AppState::new(
        RegistryConfig::default(),
        LocalStore::in_memory(),
        connector,
        pinning.clone(),
    );
    TestApp {
        router: build_router(state.clone()),
        state,
        ledger,
        pinning,
    }
}

impl TestApp {
    pub async fn connect(&self) {
        let (status, _) = self.send(Request::post("/api/wallet/connect").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::put(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Hand-built multipart body. Each part is `(name, filename+mime, content)`.
pub fn multipart_body(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----land-registry-test-boundary";
    let mut body = Vec::new();
    for (name, file, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match file {
            Some((filename, mime)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    name, filename, mime
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}

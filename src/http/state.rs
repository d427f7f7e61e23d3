//! Shared gateway state.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::auth::{SessionManager, UserDirectory, WalletConnector, WalletSession, WalletState};
use crate::blockchain::LandEvent;
use crate::config::RegistryConfig;
use crate::ipfs::{PinningService, UploadCache, UploadService};
use crate::registry::LandService;
use crate::storage::LocalStore;

/// Capacity of the event fan-out channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RegistryConfig>,
    pub sessions: SessionManager,
    pub users: UserDirectory,
    pub wallet: WalletState,
    pub connector: Arc<dyn WalletConnector>,
    pub uploads: UploadService,
    pub events: broadcast::Sender<LandEvent>,
}

impl AppState {
    pub fn new(
        config: RegistryConfig,
        store: LocalStore,
        connector: Arc<dyn WalletConnector>,
        pinning: Arc<dyn PinningService>,
    ) -> Self {
        let uploads = UploadService::new(pinning, UploadCache::load(store.clone()), config.ipfs.clone());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: Arc::new(config),
            sessions: SessionManager::new(store.clone()),
            users: UserDirectory::new(store.clone()),
            wallet: WalletState::new(store),
            connector,
            uploads,
            events,
        }
    }

    /// Registry operations signed by the connected wallet.
    pub fn land_service(&self, session: &WalletSession) -> LandService {
        LandService::new(
            session.ledger.clone(),
            self.uploads.clone(),
            self.config.blockchain.land_scan_limit,
        )
    }
}

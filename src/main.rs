//! Land registry gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                  LAND REGISTRY GATEWAY                │
//!   HTTP / WS      │  ┌─────────┐   ┌──────────┐   ┌──────────────────┐   │
//!  ───────────────▶│  │  http   │──▶│   gate   │──▶│ registry / auth  │   │
//!                  │  │ server  │   │ (roles)  │   │   services       │   │
//!                  │  └─────────┘   └──────────┘   └────────┬─────────┘   │
//!                  │       ▲                                 │             │
//!                  │       │ events                 ┌────────┴────────┐    │
//!                  │  ┌────┴─────┐                  ▼                 ▼    │
//!                  │  │  event   │           ┌────────────┐    ┌─────────┐ │
//!                  │  │ watcher  │◀──────────│ blockchain │    │  ipfs   │ │
//!                  │  └──────────┘   logs    │ (contract) │    │ uploads │ │
//!                  │                         └─────┬──────┘    └────┬────┘ │
//!                  │  ┌─────────────────────────────┼────────────────┼───┐ │
//!                  │  │ config · storage · observability · lifecycle │   │ │
//!                  │  └─────────────────────────────┼────────────────┼───┘ │
//!                  └────────────────────────────────┼────────────────┼─────┘
//!                                                   ▼                ▼
//!                                              JSON-RPC node    Pinning service
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use land_registry::auth::ChainConnector;
use land_registry::blockchain::contract::configured_address;
use land_registry::blockchain::{BlockchainClient, EventWatcher};
use land_registry::config::load_or_default;
use land_registry::ipfs::PinataClient;
use land_registry::lifecycle::{spawn_signal_handler, Shutdown};
use land_registry::observability::{logging, metrics};
use land_registry::storage::LocalStore;
use land_registry::{AppState, HttpServer};

#[derive(Debug, Parser)]
#[command(name = "land-registry", version, about = "Land registry gateway")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("land-registry v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.blockchain.contract_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = LocalStore::from_config(&config.storage.path)?;
    let client = BlockchainClient::connect_lazy(config.blockchain.clone())?;
    if !client.is_healthy().await {
        tracing::warn!(rpc_url = %config.blockchain.rpc_url, "RPC node unreachable; chain calls will fail until it is up");
    }

    let pinata = PinataClient::new(&config.ipfs)?;
    if !pinata.is_configured() {
        tracing::warn!("Pinata credentials not set; uploads will be rejected");
    }

    let state = AppState::new(
        config.clone(),
        store,
        Arc::new(ChainConnector::new(client.clone())),
        Arc::new(pinata),
    );

    if state.wallet.was_connected() {
        if let Err(e) = state.wallet.connect(state.connector.as_ref(), None).await {
            tracing::warn!(error = %e, "Could not restore wallet connection");
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    match configured_address(&config.blockchain.contract_address) {
        Ok(address) => {
            let watcher = EventWatcher::new(client.clone(), address, state.events.clone());
            tokio::spawn(watcher.run(shutdown.subscribe()));
        }
        Err(e) => tracing::warn!(error = %e, "Event watcher disabled"),
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(state).run(listener, shutdown.signalled()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

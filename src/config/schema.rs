//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the registry
//! gateway and CLI. All types derive Serde traits for deserialization from
//! config files, and every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Environment variable overriding `ipfs.api_key`.
pub const PINATA_API_KEY_ENV_VAR: &str = "PINATA_API_KEY";

/// Environment variable overriding `ipfs.secret_api_key`.
pub const PINATA_SECRET_ENV_VAR: &str = "PINATA_SECRET_API_KEY";

/// Root configuration for the land registry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Gateway listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Chain and contract settings.
    pub blockchain: BlockchainConfig,

    /// Pinning service settings.
    pub ipfs: IpfsConfig,

    /// Local storage settings.
    pub storage: StorageConfig,

    /// Test credentials for the admin and inspector logins.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Maximum request body size in bytes (document uploads included).
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            max_body_size: 50 * 1024 * 1024,
        }
    }
}

/// Timeout configuration for gateway requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 300 }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (31337 for a local Hardhat or Anvil node).
    pub chain_id: u64,

    /// Deployed LandRegistry address. Empty until deployed.
    pub contract_address: String,

    /// Path of the contract artifact (`{abi, bytecode, address?}`).
    pub artifact_path: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations a transaction must reach.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for a transaction to confirm, in seconds.
    pub tx_timeout_secs: u64,

    /// Highest land ID scanned when reconstructing holdings.
    pub land_scan_limit: u64,

    /// Event polling interval in milliseconds.
    pub event_poll_interval_ms: u64,

    /// Maximum gas price in gwei for plain value transfers.
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            contract_address: String::new(),
            artifact_path: "artifacts/LandRegistry.json".to_string(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            tx_timeout_secs: 120,
            land_scan_limit: 100,
            event_poll_interval_ms: 4000,
            max_gas_price_gwei: 500,
        }
    }
}

/// Image downscaling applied before upload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Enable downscaling of large images.
    pub enabled: bool,

    /// Images larger than this many bytes are downscaled.
    pub threshold_bytes: usize,

    /// Maximum width and height of the output, in pixels.
    pub max_dimension: u32,

    /// JPEG quality of the output (1-100).
    pub jpeg_quality: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_bytes: 500_000,
            max_dimension: 1200,
            jpeg_quality: 70,
        }
    }
}

/// Pinning service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IpfsConfig {
    /// Pinning API base URL.
    pub api_url: String,

    /// Gateway base URL used to build document links.
    pub gateway_url: String,

    /// API key (overridden by `PINATA_API_KEY`).
    pub api_key: String,

    /// API secret (overridden by `PINATA_SECRET_API_KEY`).
    pub secret_api_key: String,

    /// Upload timeout in seconds.
    pub upload_timeout_secs: u64,

    /// Entries kept before the upload cache is pruned.
    pub cache_capacity: usize,

    /// Oldest entries removed per prune.
    pub cache_prune_batch: usize,

    pub compression: CompressionConfig,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://cloudflare-ipfs.com/ipfs".to_string(),
            api_key: String::new(),
            secret_api_key: String::new(),
            upload_timeout_secs: 60,
            cache_capacity: 50,
            cache_prune_batch: 10,
            compression: CompressionConfig::default(),
        }
    }
}

impl IpfsConfig {
    /// Replace the API credentials with values from the environment, if set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(PINATA_API_KEY_ENV_VAR) {
            self.api_key = key;
        }
        if let Ok(secret) = std::env::var(PINATA_SECRET_ENV_VAR) {
            self.secret_api_key = secret;
        }
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the local store. Empty keeps everything in memory.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "land-registry-storage.json".to_string(),
        }
    }
}

/// Login credentials for the simulated staff accounts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_id: String,
    pub admin_password: String,
    pub inspector_id: String,
    pub inspector_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // Test credentials only.
            admin_id: "admin".to_string(),
            admin_password: "admin123".to_string(),
            inspector_id: "inspector".to_string(),
            inspector_password: "insp123".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

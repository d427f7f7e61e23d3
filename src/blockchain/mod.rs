//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment / dev account (private key)
//!     → wallet.rs (key loading)
//!     → client.rs (read-only RPC with timeouts and failover)
//!     → transaction.rs (signing provider, confirmation polling)
//!     → contract.rs (LandRegistry facade behind the LandLedger trait)
//!     → events.rs (log polling → broadcast)
//!     → deploy.rs (artifact → deployed contract)
//! ```
//!
//! # Security Constraints
//! - Private keys only from environment variables or local dev accounts
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod deploy;
pub mod events;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::{LandLedger, LandRegistryContract};
pub use events::{EventWatcher, LandEvent};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TxOutcome};
pub use wallet::Wallet;

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, env overrides for secrets)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AuthConfig, BlockchainConfig, CompressionConfig, IpfsConfig, ListenerConfig,
    ObservabilityConfig, RegistryConfig, StorageConfig, TimeoutConfig,
};

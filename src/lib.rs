//! Land registry gateway library.
//!
//! A local gateway and command-line toolkit for a land-registry smart
//! contract: wallet connection, role-gated land registration, transfer and
//! verification, document pinning to IPFS, and contract deployment.

pub mod auth;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod http;
pub mod ipfs;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod storage;
pub mod validation;

pub use config::RegistryConfig;
pub use error::ApiError;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;

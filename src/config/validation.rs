//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs and addresses before any subsystem uses them
//! - Validate value ranges (timeouts > 0, quality within 1..=100)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RegistryConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use alloy::primitives::Address;

use crate::config::schema::RegistryConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let chain = &config.blockchain;
    if url::Url::parse(&chain.rpc_url).is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is not a valid URL", chain.rpc_url),
        ));
    }
    for (i, failover) in chain.failover_urls.iter().enumerate() {
        if url::Url::parse(failover).is_err() {
            errors.push(ValidationError::new(
                &format!("blockchain.failover_urls[{}]", i),
                format!("'{}' is not a valid URL", failover),
            ));
        }
    }
    if !chain.contract_address.is_empty() && chain.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.contract_address",
            format!("'{}' is not an address", chain.contract_address),
        ));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than 0"));
    }
    if chain.tx_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.tx_timeout_secs", "must be greater than 0"));
    }
    if chain.land_scan_limit == 0 {
        errors.push(ValidationError::new("blockchain.land_scan_limit", "must be greater than 0"));
    }
    if chain.event_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "blockchain.event_poll_interval_ms",
            "must be greater than 0",
        ));
    }

    let ipfs = &config.ipfs;
    for (field, value) in [("ipfs.api_url", &ipfs.api_url), ("ipfs.gateway_url", &ipfs.gateway_url)] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::new(field, format!("'{}' is not a valid URL", value)));
        }
    }
    if ipfs.upload_timeout_secs == 0 {
        errors.push(ValidationError::new("ipfs.upload_timeout_secs", "must be greater than 0"));
    }
    if ipfs.cache_prune_batch == 0 || ipfs.cache_prune_batch > ipfs.cache_capacity {
        errors.push(ValidationError::new(
            "ipfs.cache_prune_batch",
            "must be between 1 and ipfs.cache_capacity",
        ));
    }
    // A land registration pins its documents, pins the metadata, then waits
    // for confirmation. The request must outlive all three, or the client sees
    // a timeout for a transaction that is still being mined.
    let registration_secs = ipfs
        .upload_timeout_secs
        .saturating_mul(2)
        .saturating_add(chain.tx_timeout_secs);
    if config.timeouts.request_secs != 0 && config.timeouts.request_secs <= registration_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must exceed 2 × ipfs.upload_timeout_secs + blockchain.tx_timeout_secs ({}s)",
                registration_secs
            ),
        ));
    }
    if ipfs.compression.max_dimension == 0 {
        errors.push(ValidationError::new(
            "ipfs.compression.max_dimension",
            "must be greater than 0",
        ));
    }
    if !(1..=100).contains(&ipfs.compression.jpeg_quality) {
        errors.push(ValidationError::new(
            "ipfs.compression.jpeg_quality",
            "must be between 1 and 100",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

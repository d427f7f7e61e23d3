//! IPFS upload types and errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::IpfsConfig;

/// Errors surfaced by uploads. Display strings are shown to the user as-is.
#[derive(Debug, Error)]
pub enum IpfsError {
    #[error("IPFS upload timed out. Please try again with a smaller file or check your internet connection.")]
    Timeout,

    #[error("Too many upload requests. Please wait a moment and try again.")]
    RateLimited,

    /// Message reported by the pinning service.
    #[error("{0}")]
    Service(String),

    #[error("Failed to upload to IPFS. Please try again.")]
    Failed,

    #[error("IPFS credentials are not configured")]
    NotConfigured,

    #[error("Failed to fetch {cid} from IPFS gateway: {reason}")]
    Fetch { cid: String, reason: String },
}

pub type IpfsResult<T> = Result<T, IpfsError>;

/// A file as received from the user.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    /// Last-modified time in milliseconds since the epoch, 0 when unknown.
    pub modified_ms: i64,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
            modified_ms: 0,
        }
    }

    pub fn with_modified(mut self, modified_ms: i64) -> Self {
        self.modified_ms = modified_ms;
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// `pinataMetadata` attached to every pin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub keyvalues: BTreeMap<String, String>,
}

impl PinMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyvalues: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.keyvalues.insert(key.to_string(), value.into());
        self
    }
}

/// Pinning service response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub cid: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
}

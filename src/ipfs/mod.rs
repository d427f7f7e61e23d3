//! IPFS upload subsystem.
//!
//! # Data Flow
//! ```text
//! FileUpload
//!     → cache.rs (fingerprint lookup; hit returns the CID)
//!     → compress.rs (oversized raster images downscaled to JPEG)
//!     → cache.rs (prune oldest entries past capacity)
//!     → client.rs (pin through the pinning service, bounded by a timeout)
//!     → cache.rs (record fingerprint → CID)
//! ```
//!
//! # Design Decisions
//! - Single attempt per upload; no retry, no chunking
//! - Compression failures fall back to the original bytes
//! - The cache stores CIDs, gateway URLs are derived on demand

pub mod cache;
pub mod client;
pub mod compress;
pub mod types;
pub mod uploader;

pub use cache::UploadCache;
pub use client::{PinataClient, PinningService};
pub use types::{FileUpload, IpfsError, IpfsResult, PinMetadata, PinResponse};
pub use uploader::UploadService;

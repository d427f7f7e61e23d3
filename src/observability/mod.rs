//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every gateway log line
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed
//! - Secrets (private keys, Pinata credentials) are never logged

pub mod logging;
pub mod metrics;

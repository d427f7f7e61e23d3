//! Land registry subsystem.
//!
//! # Data Flow
//! ```text
//! LandForm → forms.rs (field rules) → LandDraft
//!     → service.rs (upload documents, pin metadata, registerLand)
//! Transfer: forms.rs (new owner) → service.rs (ownership + verified checks) → transferLand
//! Views: enumeration.rs (ID scan) → dashboard.rs (per-role summaries)
//! ```
//!
//! # Design Decisions
//! - All checks that can fail locally run before any transaction is sent
//! - Area and land type live in the pinned metadata, not on chain

pub mod dashboard;
pub mod enumeration;
pub mod forms;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod test_ledger;

pub use enumeration::{all_lands, next_free_id, owned_lands};
pub use forms::{LandDraft, LandForm};
pub use service::LandService;
pub use types::{LandAction, LandRecord, LandType, RegisteredLand, RegistryError, RegistryResult};

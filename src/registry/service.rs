//! Land actions on behalf of the connected account.

use std::sync::Arc;

use alloy::primitives::Address;
use serde_json::{json, Value};

use crate::blockchain::LandLedger;
use crate::ipfs::{PinMetadata, UploadService};
use crate::registry::enumeration::{all_lands, next_free_id, owned_lands};
use crate::registry::forms::{parse_new_owner, LandDraft};
use crate::registry::types::{LandAction, LandRecord, LandType, RegisteredLand, RegistryError, RegistryResult};
use crate::validation::FieldError;

/// Registry operations for one signer.
#[derive(Clone)]
pub struct LandService {
    ledger: Arc<dyn LandLedger>,
    uploads: UploadService,
    scan_limit: u64,
}

impl LandService {
    pub fn new(ledger: Arc<dyn LandLedger>, uploads: UploadService, scan_limit: u64) -> Self {
        Self {
            ledger,
            uploads,
            scan_limit,
        }
    }

    pub fn account(&self) -> Address {
        self.ledger.account()
    }

    pub fn scan_limit(&self) -> u64 {
        self.scan_limit
    }

    pub async fn owned(&self) -> Vec<LandRecord> {
        owned_lands(self.ledger.as_ref(), self.account(), self.scan_limit).await
    }

    pub async fn all(&self) -> Vec<LandRecord> {
        all_lands(self.ledger.as_ref(), self.scan_limit).await
    }

    /// One land with area and type filled in from its pinned metadata when reachable.
    pub async fn land(&self, land_id: u64) -> RegistryResult<LandRecord> {
        let mut land = match self.ledger.get_land(land_id).await {
            Ok(land) if land.exists() => land,
            Ok(_) => return Err(RegistryError::NotFound(land_id)),
            Err(e) => {
                tracing::debug!(land_id, error = %e, "Land read failed");
                return Err(RegistryError::NotFound(land_id));
            }
        };

        if !land.document_cid.is_empty() {
            match self.uploads.pinning().fetch_json(&land.document_cid).await {
                Ok(metadata) => apply_metadata(&mut land, &metadata),
                Err(e) => tracing::debug!(land_id, error = %e, "Land metadata unavailable"),
            }
        }
        Ok(land)
    }

    /// Upload the documents, pin the metadata and record the land.
    pub async fn register(&self, draft: LandDraft) -> RegistryResult<RegisteredLand> {
        let land_id = match draft.land_id {
            Some(id) if id > self.scan_limit => {
                return Err(RegistryError::Validation(vec![FieldError::new(
                    "landId",
                    format!("Land ID must be between 1 and {}", self.scan_limit),
                )]));
            }
            Some(id) => id,
            None => next_free_id(self.ledger.as_ref(), self.scan_limit)
                .await
                .ok_or(RegistryError::RegistryFull(self.scan_limit))?,
        };
        let owner = draft.owner.unwrap_or_else(|| self.account());

        let document_cid = if draft.documents.is_empty() {
            String::new()
        } else {
            let files = draft
                .documents
                .iter()
                .map(|file| {
                    let metadata = PinMetadata::named(format!("{}-{}", draft.location, file.name))
                        .with("landLocation", draft.location.clone())
                        .with("documentType", file.mime.clone());
                    (file.clone(), metadata)
                })
                .collect();
            let cids = self.uploads.upload_all(files).await?;

            let documents: Vec<Value> = draft
                .documents
                .iter()
                .zip(&cids)
                .map(|(file, cid)| {
                    json!({
                        "name": file.name,
                        "hash": cid,
                        "size": file.size(),
                        "type": file.mime,
                    })
                })
                .collect();
            let metadata = json!({
                "documents": documents,
                "landDetails": {
                    "location": draft.location,
                    "area": draft.area,
                    "landType": draft.land_type,
                },
            });
            self.uploads
                .upload_json(&metadata, PinMetadata::named(format!("{}-metadata", draft.location)))
                .await?
        };

        let outcome = self
            .ledger
            .register_land(land_id, owner, &draft.location, &document_cid)
            .await?;
        tracing::info!(land_id, owner = %owner, tx_hash = %outcome.tx_hash, "Land registered");
        Ok(RegisteredLand {
            land_id,
            tx_hash: outcome.tx_hash,
            document_cid,
        })
    }

    /// Transfer one of the caller's verified lands.
    pub async fn transfer(&self, land_id: u64, new_owner: &str) -> RegistryResult<LandAction> {
        let new_owner = parse_new_owner(new_owner).map_err(|e| RegistryError::Validation(vec![e]))?;
        if new_owner == self.account() {
            return Err(RegistryError::SelfTransfer);
        }

        let land = self
            .owned()
            .await
            .into_iter()
            .find(|land| land.id == land_id)
            .ok_or(RegistryError::LandNotOwned)?;
        if !land.is_verified {
            return Err(RegistryError::NotVerified);
        }

        let outcome = self.ledger.transfer_land(land_id, new_owner).await?;
        tracing::info!(land_id, to = %new_owner, tx_hash = %outcome.tx_hash, "Land transferred");
        Ok(LandAction {
            land_id,
            tx_hash: outcome.tx_hash,
            block_number: outcome.block_number,
        })
    }

    /// Mark an existing land verified.
    pub async fn verify(&self, land_id: u64) -> RegistryResult<LandAction> {
        match self.ledger.get_land(land_id).await {
            Ok(land) if land.exists() => {}
            _ => return Err(RegistryError::NotFound(land_id)),
        }
        let outcome = self.ledger.verify_land(land_id).await?;
        tracing::info!(land_id, tx_hash = %outcome.tx_hash, "Land verified");
        Ok(LandAction {
            land_id,
            tx_hash: outcome.tx_hash,
            block_number: outcome.block_number,
        })
    }
}

fn apply_metadata(land: &mut LandRecord, metadata: &Value) {
    let details = &metadata["landDetails"];
    land.area = details["area"].as_u64();
    land.land_type = details["landType"].as_str().and_then(|t| t.parse::<LandType>().ok());
}

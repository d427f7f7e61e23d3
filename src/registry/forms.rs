//! Land registration and transfer form rules.

use alloy::primitives::Address;

use crate::ipfs::FileUpload;
use crate::registry::types::LandType;
use crate::validation::{is_eth_address, FieldError};

/// Document extensions accepted on a land registration.
pub const ALLOWED_DOCUMENT_EXTENSIONS: [&str; 6] = ["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Submitted land registration form. Text fields are raw form values.
#[derive(Debug, Clone, Default)]
pub struct LandForm {
    pub location: String,
    pub area: String,
    pub land_type: String,
    /// Explicit land ID; the first free ID is used when absent.
    pub land_id: Option<u64>,
    /// Registered owner; the caller when absent.
    pub owner: Option<String>,
    pub documents: Vec<FileUpload>,
}

/// A validated registration.
#[derive(Debug, Clone)]
pub struct LandDraft {
    pub location: String,
    pub area: u64,
    pub land_type: LandType,
    pub land_id: Option<u64>,
    pub owner: Option<Address>,
    pub documents: Vec<FileUpload>,
}

impl LandForm {
    pub fn validate(self) -> Result<LandDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let location = self.location.trim().to_string();
        if location.is_empty() {
            errors.push(FieldError::new("location", "Location is required"));
        }

        let area = self.area.trim();
        let parsed_area = if area.is_empty() {
            errors.push(FieldError::new("area", "Area is required"));
            None
        } else {
            match area.parse::<f64>() {
                Ok(value) if value >= 1.0 => Some(value as u64),
                _ => {
                    errors.push(FieldError::new("area", "Area must be greater than 0"));
                    None
                }
            }
        };

        let land_type = if self.land_type.trim().is_empty() {
            errors.push(FieldError::new("landType", "Land type is required"));
            None
        } else {
            match self.land_type.parse::<LandType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push(FieldError::new("landType", "Invalid land type"));
                    None
                }
            }
        };

        if self.land_id == Some(0) {
            errors.push(FieldError::new("landId", "Land ID must be greater than 0"));
        }

        let owner = match self.owner.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
            None => None,
            Some(raw) if is_eth_address(raw) => raw.parse::<Address>().ok(),
            Some(_) => {
                errors.push(FieldError::new("owner", "Please enter a valid Ethereum address"));
                None
            }
        };

        for doc in &self.documents {
            let allowed = doc
                .extension()
                .is_some_and(|ext| ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext.as_str()));
            if !allowed {
                errors.push(FieldError::new(
                    "documents",
                    format!(
                        "Invalid file type: {}. Allowed: {}",
                        doc.name,
                        ALLOWED_DOCUMENT_EXTENSIONS.join(", ")
                    ),
                ));
            }
        }

        match (parsed_area, land_type) {
            (Some(area), Some(land_type)) if errors.is_empty() => Ok(LandDraft {
                location,
                area,
                land_type,
                land_id: self.land_id,
                owner,
                documents: self.documents,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse the new-owner field of a transfer.
pub fn parse_new_owner(raw: &str) -> Result<Address, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new("newOwner", "New owner address is required"));
    }
    if !is_eth_address(raw) {
        return Err(FieldError::new("newOwner", "Please enter a valid Ethereum address"));
    }
    raw.parse()
        .map_err(|_| FieldError::new("newOwner", "Please enter a valid Ethereum address"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LandForm {
        LandForm {
            location: "Survey 12, Anand".to_string(),
            area: "1500".to_string(),
            land_type: "Agricultural".to_string(),
            documents: vec![FileUpload::new("deed.pdf", "application/pdf", vec![1])],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let draft = form().validate().unwrap();
        assert_eq!(draft.area, 1500);
        assert_eq!(draft.land_type, LandType::Agricultural);
        assert!(draft.owner.is_none());
    }

    #[test]
    fn test_area_and_type_rules() {
        let errors = LandForm {
            area: "0".to_string(),
            land_type: "Swamp".to_string(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors[0], FieldError::new("area", "Area must be greater than 0"));
        assert_eq!(errors[1].field, "landType");
    }

    #[test]
    fn test_missing_fields() {
        let errors = LandForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["location", "area", "landType"]);
    }

    #[test]
    fn test_document_extensions() {
        let errors = LandForm {
            documents: vec![
                FileUpload::new("plan.DOCX", "application/octet-stream", vec![1]),
                FileUpload::new("run.exe", "application/octet-stream", vec![1]),
            ],
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Invalid file type: run.exe"));
    }

    #[test]
    fn test_new_owner() {
        assert_eq!(
            parse_new_owner("").unwrap_err().message,
            "New owner address is required"
        );
        assert_eq!(
            parse_new_owner("0x1234").unwrap_err().message,
            "Please enter a valid Ethereum address"
        );
        assert!(parse_new_owner("0xcd3B766CCDd6AE721141F452C550Ca635964ce71").is_ok());
    }
}

//! Multipart form decoding.
//!
//! Text parts become fields; file parts become [`FileUpload`]s. A text part
//! named `lastModified` (milliseconds since the epoch) applies to the file
//! part that follows it; files without one get 0.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::auth::CustomerRegistration;
use crate::error::{ApiError, ApiResult};
use crate::ipfs::FileUpload;
use crate::registry::LandForm;
use crate::validation::FieldError;

const LAST_MODIFIED_FIELD: &str = "lastModified";

#[derive(Debug, Default)]
pub struct FormParts {
    pub fields: HashMap<String, String>,
    pub files: Vec<(String, FileUpload)>,
}

impl FormParts {
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn file(&self, name: &str) -> Option<FileUpload> {
        self.files.iter().find(|(field, _)| field == name).map(|(_, f)| f.clone())
    }

    pub fn all_files(&self, name: &str) -> Vec<FileUpload> {
        self.files
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, f)| f.clone())
            .collect()
    }
}

pub async fn read_multipart(mut multipart: Multipart) -> ApiResult<FormParts> {
    let mut parts = FormParts::default();
    let mut pending_modified: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let mime = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid file {}: {}", file_name, e)))?;
                let file = FileUpload::new(file_name, mime, bytes.to_vec())
                    .with_modified(pending_modified.take().unwrap_or(0));
                parts.files.push((name, file));
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                if name == LAST_MODIFIED_FIELD {
                    pending_modified = value.trim().parse().ok();
                } else {
                    parts.fields.insert(name, value);
                }
            }
        }
    }
    Ok(parts)
}

impl From<FormParts> for CustomerRegistration {
    fn from(parts: FormParts) -> Self {
        CustomerRegistration {
            role: parts.text("role"),
            full_name: parts.text("fullName"),
            email: parts.text("email"),
            contact: parts.text("contact"),
            aadhaar: parts.text("aadhaar"),
            pan: parts.text("pan"),
            aadhaar_file: parts.file("aadhaarFile"),
            pan_file: parts.file("panFile"),
        }
    }
}

/// Build a land form; a non-numeric `landId` is a field error.
pub fn land_form(parts: FormParts) -> ApiResult<LandForm> {
    let land_id = match parts.fields.get("landId").map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => None,
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
            ApiError::Validation(vec![FieldError::new("landId", "Land ID must be a number")])
        })?),
    };
    Ok(LandForm {
        location: parts.text("location"),
        area: parts.text("area"),
        land_type: parts.text("landType"),
        land_id,
        owner: parts.fields.get("owner").cloned(),
        documents: parts.all_files("documents"),
    })
}

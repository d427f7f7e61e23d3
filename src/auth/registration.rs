//! Customer (buyer/seller) registration.

use alloy::primitives::Address;
use chrono::Utc;

use crate::auth::session::SessionManager;
use crate::auth::types::{AuthError, AuthResult, CustomerProfile, RegisteredUser, UserSession, UserStatus};
use crate::auth::users::UserDirectory;
use crate::ipfs::{FileUpload, PinMetadata, UploadService};
use crate::validation::{
    is_identity_document, is_valid_aadhaar, is_valid_contact, is_valid_email, is_valid_pan, FieldError,
};

/// Submitted registration form.
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistration {
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub contact: String,
    pub aadhaar: String,
    pub pan: String,
    pub aadhaar_file: Option<FileUpload>,
    pub pan_file: Option<FileUpload>,
}

impl CustomerRegistration {
    /// Every failing field. Empty means the form can be submitted.
    pub fn validate(&self, wallet_connected: bool) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if !matches!(self.role.as_str(), "Buyer" | "Seller") {
            errors.push(FieldError::new("role", "Please select a role (Buyer or Seller)"));
        }
        if !wallet_connected {
            errors.push(FieldError::new("wallet", "Please connect your wallet first"));
        }

        let text_fields = [
            ("fullName", "Full name", &self.full_name),
            ("email", "Email", &self.email),
            ("contact", "Contact number", &self.contact),
            ("aadhaar", "Aadhaar number", &self.aadhaar),
            ("pan", "PAN number", &self.pan),
        ];
        for (field, label, value) in text_fields {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, format!("{} is required", label)));
            }
        }

        if !self.email.is_empty() && !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email format"));
        }
        if !self.contact.is_empty() && !is_valid_contact(&self.contact) {
            errors.push(FieldError::new("contact", "Contact must be 10 digits"));
        }
        if !self.aadhaar.is_empty() && !is_valid_aadhaar(&self.aadhaar) {
            errors.push(FieldError::new("aadhaar", "Aadhaar must be 12 digits"));
        }
        if !self.pan.is_empty() && !is_valid_pan(&self.pan) {
            errors.push(FieldError::new("pan", "Invalid PAN format"));
        }

        for (field, label, file) in [
            ("aadhaarFile", "Aadhaar document", &self.aadhaar_file),
            ("panFile", "PAN document", &self.pan_file),
        ] {
            match file {
                None => errors.push(FieldError::new(field, format!("{} is required", label))),
                Some(f) if !is_identity_document(&f.mime) => {
                    errors.push(FieldError::new(field, "Files must be PDF or JPG"))
                }
                Some(_) => {}
            }
        }

        errors
    }
}

/// Validate, upload the identity documents, start the session and list the
/// customer for admin review.
pub async fn register_customer(
    form: CustomerRegistration,
    account: Option<Address>,
    uploads: &UploadService,
    sessions: &SessionManager,
    users: &UserDirectory,
) -> AuthResult<UserSession> {
    let errors = form.validate(account.is_some());
    if !errors.is_empty() {
        return Err(AuthError::Validation(errors));
    }
    let (Some(account), Some(aadhaar_file), Some(pan_file)) = (account, form.aadhaar_file, form.pan_file) else {
        return Err(AuthError::WalletRequired);
    };

    let metadata = |kind: &str, file: &FileUpload| {
        PinMetadata::named(format!("{}-{}", account, file.name))
            .with("walletAddress", account.to_string())
            .with("documentType", kind)
    };
    let aadhaar_meta = metadata("aadhaar", &aadhaar_file);
    let pan_meta = metadata("pan", &pan_file);
    let cids = uploads
        .upload_all(vec![(aadhaar_file, aadhaar_meta), (pan_file, pan_meta)])
        .await?;
    let (aadhaar_cid, pan_cid) = (cids[0].clone(), cids[1].clone());

    let now = Utc::now();
    let session = UserSession {
        id: None,
        address: Some(account),
        role: form.role.to_lowercase(),
        user_id: Some(now.timestamp_millis()),
        timestamp: now,
        profile: Some(CustomerProfile {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            contact: form.contact,
            aadhaar: form.aadhaar,
            pan: form.pan,
            aadhaar_cid: aadhaar_cid.clone(),
            pan_cid: pan_cid.clone(),
        }),
    };
    sessions.set_user_session(&session)?;

    users.add(RegisteredUser {
        name: form.full_name,
        email: form.email,
        wallet: account.to_string(),
        role: form.role,
        status: UserStatus::Pending,
        aadhaar_file: uploads.gateway_url(&aadhaar_cid),
        pan_file: uploads.gateway_url(&pan_cid),
        registered_at: Some(now),
    })?;

    tracing::info!(account = %account, role = %session.role, "Customer registered");
    Ok(session)
}

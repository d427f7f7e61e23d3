//! Gateway error responses.
//!
//! Subsystem errors are mapped to an HTTP status once, here. The body is
//! always `{"error": message}`, with `fields` for form errors and
//! `role`/`required` for role-gate denials.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::{AuthError, Page};
use crate::blockchain::BlockchainError;
use crate::ipfs::IpfsError;
use crate::registry::RegistryError;
use crate::storage::StorageError;
use crate::validation::{summarize, FieldError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("You don't have permission to access this page")]
    Forbidden { role: String, required: Page },

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } | ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "error": self.to_string() });
        match &self {
            ApiError::Validation(fields) => body["fields"] = json!(fields),
            ApiError::Forbidden { role, required } => {
                body["role"] = json!(role);
                body["required"] = json!(required.as_str());
            }
            ApiError::Internal(message) => tracing::error!(error = %message, "Internal error"),
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}

impl From<BlockchainError> for ApiError {
    fn from(e: BlockchainError) -> Self {
        let message = e.to_string();
        match e {
            BlockchainError::Timeout(_) | BlockchainError::ConfirmationTimeout(_) => ApiError::Timeout(message),
            BlockchainError::NotOwner => ApiError::PermissionDenied(message),
            BlockchainError::Cancelled | BlockchainError::Reverted(_) => ApiError::Conflict(message),
            BlockchainError::Wallet(_) => ApiError::BadRequest(message),
            BlockchainError::Rpc(_)
            | BlockchainError::GasPriceTooHigh { .. }
            | BlockchainError::ChainMismatch { .. }
            | BlockchainError::Artifact(_)
            | BlockchainError::NotAvailable(_) => ApiError::BadGateway(message),
        }
    }
}

impl From<IpfsError> for ApiError {
    fn from(e: IpfsError) -> Self {
        match e {
            IpfsError::Timeout => ApiError::Timeout(e.to_string()),
            other => ApiError::BadGateway(other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        let message = e.to_string();
        match e {
            RegistryError::Validation(fields) => ApiError::Validation(fields),
            RegistryError::SelfTransfer | RegistryError::LandNotOwned => ApiError::BadRequest(message),
            RegistryError::NotVerified | RegistryError::RegistryFull(_) => ApiError::Conflict(message),
            RegistryError::NotFound(_) => ApiError::NotFound(message),
            RegistryError::Blockchain(e) => e.into(),
            RegistryError::Ipfs(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let message = e.to_string();
        match e {
            AuthError::InvalidCredentials | AuthError::WalletRequired => ApiError::Unauthorized(message),
            AuthError::Validation(fields) => ApiError::Validation(fields),
            AuthError::UserNotFound(_) => ApiError::NotFound(message),
            AuthError::InvalidStatus(_) => ApiError::BadRequest(message),
            AuthError::Storage(e) => e.into(),
            AuthError::Ipfs(e) => e.into(),
            AuthError::Blockchain(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(IpfsError::Timeout).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ApiError::from(IpfsError::RateLimited).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::from(RegistryError::SelfTransfer).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(RegistryError::NotFound(4)).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(AuthError::WalletRequired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(RegistryError::Blockchain(BlockchainError::Timeout(10))).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_messages_pass_through() {
        assert_eq!(
            ApiError::from(RegistryError::NotVerified).to_string(),
            "Only verified properties can be transferred"
        );
        assert_eq!(
            ApiError::from(AuthError::WalletRequired).to_string(),
            "Please connect your wallet to continue"
        );
    }
}

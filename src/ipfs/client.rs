//! Pinning service client (Pinata REST API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::ipfs::types::{FileUpload, IpfsConfig, IpfsError, IpfsResult, PinMetadata, PinResponse};

/// The pinning operations the upload facade needs.
#[async_trait]
pub trait PinningService: Send + Sync {
    async fn pin_file(&self, file: &FileUpload, metadata: &PinMetadata) -> IpfsResult<PinResponse>;

    async fn pin_json(&self, content: &Value, metadata: &PinMetadata) -> IpfsResult<PinResponse>;

    /// Retrieve a pinned JSON document through the gateway.
    async fn fetch_json(&self, cid: &str) -> IpfsResult<Value>;

    /// Check the credentials, returning the service's greeting.
    async fn test_authentication(&self) -> IpfsResult<String>;
}

/// Map a non-success response to a user-facing error.
pub fn error_from_response(status: StatusCode, body: &str) -> IpfsError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return IpfsError::RateLimited;
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| match v.get("error")? {
            Value::String(s) => Some(s.clone()),
            Value::Object(o) => o
                .get("details")
                .or_else(|| o.get("reason"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        });
    match message {
        Some(message) if !message.is_empty() => IpfsError::Service(message),
        _ => IpfsError::Failed,
    }
}

fn transport_error(e: reqwest::Error) -> IpfsError {
    if e.is_timeout() {
        IpfsError::Timeout
    } else {
        tracing::warn!(error = %e, "Pinning request failed");
        IpfsError::Failed
    }
}

/// HTTP client for Pinata.
#[derive(Clone)]
pub struct PinataClient {
    http: Client,
    api_url: String,
    gateway_url: String,
    api_key: String,
    secret_api_key: String,
}

impl PinataClient {
    pub fn new(config: &IpfsConfig) -> IpfsResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs))
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            secret_api_key: config.secret_api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_api_key.is_empty()
    }

    /// Public gateway URL of a CID.
    pub fn file_url(&self, cid: &str) -> String {
        format!("{}/{}", self.gateway_url, cid)
    }

    /// Remove a pin.
    pub async fn unpin(&self, cid: &str) -> IpfsResult<()> {
        let response = self
            .authorized(self.http.delete(format!("{}/pinning/unpin/{}", self.api_url, cid)))?
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }
        tracing::info!(cid, "Unpinned");
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> IpfsResult<reqwest::RequestBuilder> {
        if !self.is_configured() {
            return Err(IpfsError::NotConfigured);
        }
        Ok(request
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_api_key))
    }

    async fn read_pin(response: reqwest::Response) -> IpfsResult<PinResponse> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Unexpected pinning response");
            IpfsError::Failed
        })
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin_file(&self, file: &FileUpload, metadata: &PinMetadata) -> IpfsResult<PinResponse> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let part = match part.mime_str(&file.mime) {
            Ok(part) => part,
            Err(_) => Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
        };
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", json!(metadata).to_string())
            .text(
                "pinataOptions",
                json!({ "cidVersion": 1, "wrapWithDirectory": false }).to_string(),
            );

        let response = self
            .authorized(self.http.post(format!("{}/pinning/pinFileToIPFS", self.api_url)))?
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_pin(response).await
    }

    async fn pin_json(&self, content: &Value, metadata: &PinMetadata) -> IpfsResult<PinResponse> {
        let body = json!({
            "pinataContent": content,
            "pinataMetadata": metadata,
        });
        let response = self
            .authorized(self.http.post(format!("{}/pinning/pinJSONToIPFS", self.api_url)))?
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_pin(response).await
    }

    async fn fetch_json(&self, cid: &str) -> IpfsResult<Value> {
        let fetch_error = |reason: String| IpfsError::Fetch {
            cid: cid.to_string(),
            reason,
        };
        let response = self
            .http
            .get(self.file_url(cid))
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("status {}", response.status())));
        }
        response.json().await.map_err(|e| fetch_error(e.to_string()))
    }

    async fn test_authentication(&self) -> IpfsResult<String> {
        let response = self
            .authorized(self.http.get(format!("{}/data/testAuthentication", self.api_url)))?
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        Ok(serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body))
    }
}

impl std::fmt::Debug for PinataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataClient")
            .field("api_url", &self.api_url)
            .field("gateway_url", &self.gateway_url)
            .field("configured", &self.is_configured())
            .finish()
    }
}

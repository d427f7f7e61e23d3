//! Upload facade: cache lookup, optional downscaling, pin with timeout.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use serde_json::Value;
use tokio::time::timeout;

use crate::ipfs::cache::{cache_key, UploadCache};
use crate::ipfs::client::PinningService;
use crate::ipfs::compress::{compress_image, should_compress};
use crate::ipfs::types::{FileUpload, IpfsConfig, IpfsError, IpfsResult, PinMetadata};
use crate::observability::metrics;

/// Uploads files and JSON documents, returning their CIDs.
#[derive(Clone)]
pub struct UploadService {
    pinning: Arc<dyn PinningService>,
    cache: UploadCache,
    config: IpfsConfig,
}

impl UploadService {
    pub fn new(pinning: Arc<dyn PinningService>, cache: UploadCache, config: IpfsConfig) -> Self {
        Self {
            pinning,
            cache,
            config,
        }
    }

    pub fn pinning(&self) -> &Arc<dyn PinningService> {
        &self.pinning
    }

    pub fn cache(&self) -> &UploadCache {
        &self.cache
    }

    pub fn gateway_url(&self, cid: &str) -> String {
        format!("{}/{}", self.config.gateway_url.trim_end_matches('/'), cid)
    }

    /// Upload one file. A cached fingerprint returns its CID without any network call.
    pub async fn upload(&self, file: FileUpload, metadata: PinMetadata) -> IpfsResult<String> {
        let key = cache_key(&file);
        if let Some(cid) = self.cache.get(&key) {
            metrics::record_cache_hit();
            tracing::debug!(file = %file.name, cid = %cid, "Upload served from cache");
            return Ok(cid);
        }

        let file = self.prepare(file).await;
        self.cache
            .prune(self.config.cache_capacity, self.config.cache_prune_batch);

        let response = self
            .with_timeout(self.pinning.pin_file(&file, &metadata))
            .await?;
        tracing::info!(file = %file.name, size = file.size(), cid = %response.cid, "File pinned");
        self.cache.insert(key, response.cid.clone());
        Ok(response.cid)
    }

    /// Upload every file concurrently. The first failure is returned; pins
    /// that already completed are not undone.
    pub async fn upload_all(&self, files: Vec<(FileUpload, PinMetadata)>) -> IpfsResult<Vec<String>> {
        try_join_all(
            files
                .into_iter()
                .map(|(file, metadata)| self.upload(file, metadata)),
        )
        .await
    }

    /// Pin a JSON document.
    pub async fn upload_json(&self, content: &Value, metadata: PinMetadata) -> IpfsResult<String> {
        let response = self
            .with_timeout(self.pinning.pin_json(content, &metadata))
            .await?;
        tracing::info!(name = %metadata.name, cid = %response.cid, "JSON pinned");
        Ok(response.cid)
    }

    async fn prepare(&self, file: FileUpload) -> FileUpload {
        if !should_compress(&file, &self.config.compression) {
            return file;
        }
        let compression = self.config.compression.clone();
        let original = file.clone();
        let result = tokio::task::spawn_blocking(move || compress_image(&file, &compression)).await;
        match result {
            Ok(Ok(compressed)) => {
                tracing::debug!(
                    file = %compressed.name,
                    before = original.size(),
                    after = compressed.size(),
                    "Image downscaled"
                );
                compressed
            }
            Ok(Err(e)) => {
                tracing::warn!(file = %original.name, error = %e, "Compression failed, uploading original");
                original
            }
            Err(e) => {
                tracing::warn!(file = %original.name, error = %e, "Compression task failed, uploading original");
                original
            }
        }
    }

    async fn with_timeout<T>(
        &self,
        request: impl std::future::Future<Output = IpfsResult<T>>,
    ) -> IpfsResult<T> {
        let limit = Duration::from_secs(self.config.upload_timeout_secs);
        let result = match timeout(limit, request).await {
            Ok(result) => result,
            Err(_) => Err(IpfsError::Timeout),
        };
        metrics::record_upload(match &result {
            Ok(_) => "success",
            Err(IpfsError::Timeout) => "timeout",
            Err(IpfsError::RateLimited) => "rate_limited",
            Err(_) => "failure",
        });
        if let Err(e) = &result {
            tracing::error!(error = %e, "IPFS upload failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipfs::types::PinResponse;
    use crate::storage::LocalStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPins {
        calls: AtomicUsize,
        last_mime: parking_lot::Mutex<Option<String>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl PinningService for CountingPins {
        async fn pin_file(&self, file: &FileUpload, _: &PinMetadata) -> IpfsResult<PinResponse> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_mime.lock() = Some(file.mime.clone());
            Ok(PinResponse {
                cid: format!("bafy{}", n),
                pin_size: file.size() as u64,
                timestamp: String::new(),
            })
        }

        async fn pin_json(&self, _: &Value, _: &PinMetadata) -> IpfsResult<PinResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PinResponse {
                cid: "bafyjson".to_string(),
                pin_size: 0,
                timestamp: String::new(),
            })
        }

        async fn fetch_json(&self, cid: &str) -> IpfsResult<Value> {
            Err(IpfsError::Fetch {
                cid: cid.to_string(),
                reason: "not stored".to_string(),
            })
        }

        async fn test_authentication(&self) -> IpfsResult<String> {
            Ok("ok".to_string())
        }
    }

    fn service(pins: Arc<CountingPins>, config: IpfsConfig) -> UploadService {
        UploadService::new(pins, UploadCache::load(LocalStore::in_memory()), config)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let pins = Arc::new(CountingPins::default());
        let uploads = service(pins.clone(), IpfsConfig::default());
        let file = FileUpload::new("deed.pdf", "application/pdf", vec![7; 100]).with_modified(5);

        let first = uploads.upload(file.clone(), PinMetadata::named("deed.pdf")).await.unwrap();
        let second = uploads.upload(file, PinMetadata::named("deed.pdf")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(pins.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_mtime_uploads_again() {
        let pins = Arc::new(CountingPins::default());
        let uploads = service(pins.clone(), IpfsConfig::default());
        let file = FileUpload::new("deed.pdf", "application/pdf", vec![7; 100]);

        uploads.upload(file.clone().with_modified(1), PinMetadata::default()).await.unwrap();
        uploads.upload(file.with_modified(2), PinMetadata::default()).await.unwrap();
        assert_eq!(pins.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_undecodable_large_image_uploads_original() {
        let pins = Arc::new(CountingPins::default());
        let uploads = service(pins.clone(), IpfsConfig::default());
        let file = FileUpload::new("scan.png", "image/png", vec![0; 600_000]);

        uploads.upload(file, PinMetadata::default()).await.unwrap();
        assert_eq!(pins.last_mime.lock().as_deref(), Some("image/png"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_pin_times_out() {
        let pins = Arc::new(CountingPins {
            delay: Some(Duration::from_secs(120)),
            ..Default::default()
        });
        let uploads = service(pins, IpfsConfig::default());
        let file = FileUpload::new("deed.pdf", "application/pdf", vec![1; 10]);

        let err = uploads.upload(file, PinMetadata::default()).await.unwrap_err();
        assert!(matches!(err, IpfsError::Timeout));
        assert!(uploads.cache().is_empty());
    }

    #[tokio::test]
    async fn test_upload_all_returns_cids_in_order() {
        let pins = Arc::new(CountingPins::default());
        let uploads = service(pins.clone(), IpfsConfig::default());
        let files = (0..3)
            .map(|i| {
                (
                    FileUpload::new(format!("doc{}.pdf", i), "application/pdf", vec![i; 10]),
                    PinMetadata::default(),
                )
            })
            .collect();

        let cids = uploads.upload_all(files).await.unwrap();
        assert_eq!(cids.len(), 3);
        assert_eq!(pins.calls.load(Ordering::SeqCst), 3);
        assert_eq!(uploads.gateway_url("bafy0"), "https://cloudflare-ipfs.com/ipfs/bafy0");
    }
}

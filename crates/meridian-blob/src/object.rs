//! `object_store`-backed photo store implementation.

use crate::store::{PhotoStore, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use meridian_config::ObjectStorageConfig;
use meridian_core::{MeridianError, MeridianResult, UserId};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Default interval between visibility probes after a write.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Photo store over any `object_store` backend.
pub struct ObjectPhotoStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
    exists_timeout: Duration,
    poll_interval: Duration,
}

impl ObjectPhotoStore {
    /// Creates a new photo store.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        public_base_url: impl Into<String>,
        exists_timeout: Duration,
    ) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
            exists_timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the visibility-probe interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Polls `head` until the object is visible or the timeout elapses.
    async fn wait_until_exists(&self, location: &Path) -> MeridianResult<()> {
        let deadline = Instant::now() + self.exists_timeout;

        loop {
            match self.store.head(location).await {
                Ok(_) => return Ok(()),
                Err(object_store::Error::NotFound { .. }) => {
                    if Instant::now() >= deadline {
                        return Err(MeridianError::Timeout(format!(
                            "object '{}' did not become visible within {:?}",
                            location, self.exists_timeout
                        )));
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
                Err(e) => {
                    return Err(MeridianError::ObjectStorage(format!(
                        "Failed to probe object '{}': {}",
                        location, e
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl PhotoStore for ObjectPhotoStore {
    async fn upload(&self, user_id: UserId, data: Bytes) -> MeridianResult<StoredObject> {
        let object_key = format!("users/{}/photos/{}.jpg", user_id, Uuid::new_v4());
        let location = Path::from(object_key.as_str());

        self.store
            .put(&location, PutPayload::from(data))
            .await
            .map_err(|e| {
                MeridianError::ObjectStorage(format!(
                    "Failed to upload object '{}': {}",
                    object_key, e
                ))
            })?;

        self.wait_until_exists(&location).await?;

        let url = format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            object_key
        );

        debug!("Uploaded photo object '{}'", object_key);
        Ok(StoredObject { url, object_key })
    }

    async fn delete(&self, object_key: &str) -> MeridianResult<()> {
        let location = Path::from(object_key);

        match self.store.delete(&location).await {
            Ok(()) => {
                debug!("Deleted photo object '{}'", object_key);
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => {
                Err(MeridianError::not_found("photo_object", object_key))
            }
            Err(e) => Err(MeridianError::ObjectStorage(format!(
                "Failed to delete object '{}': {}",
                object_key, e
            ))),
        }
    }
}

/// Builds the configured S3 object store.
pub fn build_object_store(config: &ObjectStorageConfig) -> MeridianResult<Arc<dyn ObjectStore>> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(&config.bucket)
        .with_region(&config.region);

    if let Some(endpoint) = &config.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(access_key_id) = &config.access_key_id {
        builder = builder.with_access_key_id(access_key_id);
    }
    if let Some(secret_access_key) = &config.secret_access_key {
        builder = builder.with_secret_access_key(secret_access_key);
    }
    if config.allow_http {
        builder = builder.with_allow_http(true);
    }

    let store = builder
        .build()
        .map_err(|e| MeridianError::Configuration(format!("Failed to build object store: {}", e)))?;

    Ok(Arc::new(store))
}

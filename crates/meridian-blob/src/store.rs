//! Photo store trait definition.

use async_trait::async_trait;
use bytes::Bytes;
use meridian_core::{MeridianResult, UserId};

/// Durable handle produced by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Publicly reachable address of the object.
    pub url: String,
    /// Blob store key of the object.
    pub object_key: String,
}

/// Blob store operations for photo objects.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Uploads a photo for a user and waits, bounded by a timeout, for the
    /// written object to become visible before reporting success.
    async fn upload(&self, user_id: UserId, data: Bytes) -> MeridianResult<StoredObject>;

    /// Deletes a photo object. An absent key is reported as a distinct
    /// `NotFound` condition, never conflated with transport failures.
    async fn delete(&self, object_key: &str) -> MeridianResult<()>;
}

//! Photo service: the persistence pipeline between the blob store and the
//! relational catalogue.

use crate::dto::{PhotoResponse, PhotoUpload};
use async_trait::async_trait;
use meridian_blob::PhotoStore;
use meridian_cache::UserCache;
use meridian_core::{MeridianError, MeridianResult, PhotoId, UserId};
use meridian_repository::PhotoRepository;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Default fan-out width for one batch upload call.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 10;

/// Photo service trait.
#[async_trait]
pub trait PhotoService: Send + Sync {
    /// Uploads a batch of files for a user.
    async fn upload_photos(&self, user_id: UserId, files: Vec<PhotoUpload>) -> MeridianResult<()>;

    /// Lists a user's photos. Pass-through catalogue read, uncached.
    async fn get_photos(&self, user_id: UserId) -> MeridianResult<Vec<PhotoResponse>>;

    /// Deletes one photo. A missing photo is a satisfied delete, not an
    /// error.
    async fn delete_photo(&self, user_id: UserId, photo_id: PhotoId) -> MeridianResult<()>;
}

/// Photo service implementation.
///
/// Holds typed references to the capabilities it orchestrates: the photo
/// catalogue, the blob store, and the user-record cache it invalidates.
///
/// The catalogue and the blob store are independent; no transaction spans
/// both. Consistency comes from strict per-task ordering (blob write before
/// catalogue write, catalogue delete before blob delete) plus compensating
/// actions on the failing step. The one state compensation cannot always
/// prevent is a blob with no catalogue row; that orphan is left to offline
/// cleanup.
pub struct PhotoServiceImpl {
    catalogue: Arc<dyn PhotoRepository>,
    blobs: Arc<dyn PhotoStore>,
    user_cache: Arc<dyn UserCache>,
    photo_limit: u64,
    upload_concurrency: usize,
}

impl PhotoServiceImpl {
    /// Creates a new photo service.
    pub fn new(
        catalogue: Arc<dyn PhotoRepository>,
        blobs: Arc<dyn PhotoStore>,
        user_cache: Arc<dyn UserCache>,
        photo_limit: u64,
    ) -> Self {
        Self {
            catalogue,
            blobs,
            user_cache,
            photo_limit,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }

    /// Overrides the fan-out width.
    #[must_use]
    pub fn with_upload_concurrency(mut self, upload_concurrency: usize) -> Self {
        self.upload_concurrency = upload_concurrency.max(1);
        self
    }

    /// Invalidates the cached record of a user. A cache failure degrades
    /// performance but never blocks the data path, so it is only logged.
    async fn invalidate_user_cache(&self, user_id: UserId) {
        if let Err(e) = self.user_cache.invalidate(user_id).await {
            warn!("Failed to invalidate cached user {}: {}", user_id, e);
        }
    }
}

#[async_trait]
impl PhotoService for PhotoServiceImpl {
    async fn upload_photos(&self, user_id: UserId, files: Vec<PhotoUpload>) -> MeridianResult<()> {
        debug!("Uploading {} photos for user {}", files.len(), user_id);

        // Ceiling check before any I/O.
        let current = self.catalogue.count_by_user(user_id).await?;
        let incoming = files.len() as u64;
        if current + incoming > self.photo_limit {
            return Err(MeridianError::PhotoLimitExceeded {
                current,
                incoming,
                limit: self.photo_limit,
            });
        }

        let semaphore = Arc::new(Semaphore::new(self.upload_concurrency));
        let mut tasks: JoinSet<MeridianResult<()>> = JoinSet::new();

        for upload in files {
            let semaphore = Arc::clone(&semaphore);
            let catalogue = Arc::clone(&self.catalogue);
            let blobs = Arc::clone(&self.blobs);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| MeridianError::internal("upload semaphore closed"))?;

                if let Some(name) = &upload.file_name {
                    debug!("Uploading file '{}' for user {}", name, user_id);
                }

                let stored = blobs.upload(user_id, upload.data).await?;

                // The blob write strictly precedes the catalogue write; on
                // failure the compensating blob delete strictly follows.
                match catalogue
                    .create_photo(user_id, &stored.url, &stored.object_key)
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(create_err) => match blobs.delete(&stored.object_key).await {
                        Ok(()) | Err(MeridianError::NotFound { .. }) => {
                            warn!(
                                "Rolled back blob '{}' after catalogue write failure",
                                stored.object_key
                            );
                            Err(create_err)
                        }
                        Err(rollback_err) => Err(MeridianError::rollback(
                            "create photo record",
                            create_err,
                            rollback_err,
                        )),
                    },
                }
            });
        }

        // Siblings are never cancelled because one of them failed; every
        // task runs to its own outcome.
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Photo upload task failed: {}", e);
                    failures.push(e);
                }
                Err(e) => {
                    error!("Photo upload task aborted: {}", e);
                    failures.push(MeridianError::internal(format!(
                        "upload task aborted: {}",
                        e
                    )));
                }
            }
        }

        // Invalidate on every outcome, success or partial failure.
        self.invalidate_user_cache(user_id).await;

        if failures.is_empty() {
            info!("Uploaded {} photos for user {}", incoming, user_id);
            return Ok(());
        }

        warn!(
            "{} of {} photo uploads failed for user {}",
            failures.len(),
            incoming,
            user_id
        );

        // A double fault outranks plain task failures.
        if let Some(pos) = failures
            .iter()
            .position(|e| matches!(e, MeridianError::Rollback { .. }))
        {
            return Err(failures.swap_remove(pos));
        }
        Err(failures.swap_remove(0))
    }

    async fn get_photos(&self, user_id: UserId) -> MeridianResult<Vec<PhotoResponse>> {
        debug!("Listing photos for user {}", user_id);

        let photos = self.catalogue.get_photos(user_id).await?;
        Ok(photos.into_iter().map(PhotoResponse::from).collect())
    }

    async fn delete_photo(&self, user_id: UserId, photo_id: PhotoId) -> MeridianResult<()> {
        debug!("Deleting photo {} of user {}", photo_id, user_id);

        // Fetch first: the row is the rollback data for the blob delete.
        let Some(photo) = self.catalogue.get_photo(photo_id).await? else {
            debug!("Photo {} already absent, delete satisfied", photo_id);
            return Ok(());
        };

        if photo.user_id != user_id {
            return Err(MeridianError::not_found("photo", photo_id));
        }

        let removed = self.catalogue.delete_photo(user_id, photo_id).await?;
        if !removed {
            // lost a race with a concurrent delete; the goal state holds
            debug!("Photo {} removed concurrently", photo_id);
            return Ok(());
        }

        match self.blobs.delete(&photo.object_key).await {
            Ok(()) => {}
            Err(MeridianError::NotFound { .. }) => {
                debug!("Blob '{}' already absent", photo.object_key);
            }
            Err(delete_err) => {
                // The catalogue delete succeeded but the blob survives;
                // restore the row so no URL ever dangles.
                return match self.catalogue.restore_photo(&photo).await {
                    Ok(()) => {
                        warn!(
                            "Restored catalogue row {} after blob delete failure",
                            photo.id
                        );
                        Err(delete_err)
                    }
                    Err(restore_err) => Err(MeridianError::rollback(
                        "delete photo object",
                        delete_err,
                        restore_err,
                    )),
                };
            }
        }

        self.invalidate_user_cache(user_id).await;

        info!("Deleted photo {} of user {}", photo_id, user_id);
        Ok(())
    }
}

impl std::fmt::Debug for PhotoServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoServiceImpl")
            .field("photo_limit", &self.photo_limit)
            .field("upload_concurrency", &self.upload_concurrency)
            .finish_non_exhaustive()
    }
}

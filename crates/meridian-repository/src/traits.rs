//! Repository trait definitions.

use async_trait::async_trait;
use meridian_core::{MeridianResult, Photo, PhotoId, User, UserId};

/// User catalogue trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Saves a new user.
    async fn create(&self, user: &User) -> MeridianResult<User>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> MeridianResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> MeridianResult<Option<User>>;

    /// Checks if an email is already registered.
    async fn exists_by_email(&self, email: &str) -> MeridianResult<bool>;
}

/// Photo catalogue trait.
///
/// "No rows affected" outcomes are reported distinctly (a `false` return or
/// `None`), never conflated with transport errors.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Inserts a photo row for a freshly uploaded object.
    async fn create_photo(
        &self,
        user_id: UserId,
        url: &str,
        object_key: &str,
    ) -> MeridianResult<Photo>;

    /// Lists all photos of a user.
    async fn get_photos(&self, user_id: UserId) -> MeridianResult<Vec<Photo>>;

    /// Fetches a single photo by ID.
    async fn get_photo(&self, id: PhotoId) -> MeridianResult<Option<Photo>>;

    /// Deletes a photo row. Returns `false` when no row matched.
    async fn delete_photo(&self, user_id: UserId, id: PhotoId) -> MeridianResult<bool>;

    /// Counts the photos stored for a user.
    async fn count_by_user(&self, user_id: UserId) -> MeridianResult<u64>;

    /// Re-inserts a previously fetched row, keeping its original ID and
    /// timestamps. Used to compensate a failed blob delete.
    async fn restore_photo(&self, photo: &Photo) -> MeridianResult<()>;
}

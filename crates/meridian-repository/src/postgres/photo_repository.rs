//! PostgreSQL photo repository implementation.

use crate::{traits::PhotoRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meridian_core::{MeridianResult, Photo, PhotoId, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL photo repository implementation.
#[derive(Clone)]
pub struct PgPhotoRepository {
    pool: Arc<DatabasePool>,
}

impl PgPhotoRepository {
    /// Creates a new PostgreSQL photo repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a photo.
#[derive(Debug, FromRow)]
struct PhotoRow {
    id: i64,
    user_id: Uuid,
    url: String,
    object_key: String,
    created_at: DateTime<Utc>,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: PhotoId::from_i64(row.id),
            user_id: UserId::from_uuid(row.user_id),
            url: row.url,
            object_key: row.object_key,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn create_photo(
        &self,
        user_id: UserId,
        url: &str,
        object_key: &str,
    ) -> MeridianResult<Photo> {
        debug!("Creating photo row for user: {}", user_id);

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            INSERT INTO photos (user_id, url, object_key)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, url, object_key, created_at
            "#,
        )
        .bind(user_id.into_inner())
        .bind(url)
        .bind(object_key)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(Photo::from(row))
    }

    async fn get_photos(&self, user_id: UserId) -> MeridianResult<Vec<Photo>> {
        debug!("Listing photos for user: {}", user_id);

        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, user_id, url, object_key, created_at
            FROM photos
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn get_photo(&self, id: PhotoId) -> MeridianResult<Option<Photo>> {
        debug!("Fetching photo: {}", id);

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, user_id, url, object_key, created_at
            FROM photos
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Photo::from))
    }

    async fn delete_photo(&self, user_id: UserId, id: PhotoId) -> MeridianResult<bool> {
        debug!("Deleting photo {} of user {}", id, user_id);

        let result = sqlx::query("DELETE FROM photos WHERE user_id = $1 AND id = $2")
            .bind(user_id.into_inner())
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_user(&self, user_id: UserId) -> MeridianResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE user_id = $1")
            .bind(user_id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;

        Ok(count as u64)
    }

    async fn restore_photo(&self, photo: &Photo) -> MeridianResult<()> {
        debug!("Restoring photo row: {}", photo.id);

        sqlx::query(
            r#"
            INSERT INTO photos (id, user_id, url, object_key, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(photo.id.into_inner())
        .bind(photo.user_id.into_inner())
        .bind(&photo.url)
        .bind(&photo.object_key)
        .bind(photo.created_at)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_row_converts() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let row = PhotoRow {
            id: 7,
            user_id,
            url: "https://storage.example.com/bucket/users/u/photos/p.jpg".to_string(),
            object_key: "users/u/photos/p.jpg".to_string(),
            created_at: now,
        };

        let photo = Photo::from(row);
        assert_eq!(photo.id.into_inner(), 7);
        assert_eq!(photo.user_id.into_inner(), user_id);
        assert_eq!(photo.object_key, "users/u/photos/p.jpg");
    }
}

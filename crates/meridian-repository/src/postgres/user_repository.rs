//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meridian_core::{Coordinates, MeridianResult, User, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Arc<DatabasePool>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    longitude: Option<f64>,
    latitude: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let location = match (row.longitude, row.latitude) {
            (Some(longitude), Some(latitude)) => Some(Coordinates {
                longitude,
                latitude,
            }),
            _ => None,
        };

        User {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> MeridianResult<User> {
        debug!("Creating user: {}", user.id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, longitude, latitude, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, longitude, latitude, created_at, updated_at
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.location.map(|l| l.longitude))
        .bind(user.location.map(|l| l.latitude))
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(User::from(row))
    }

    async fn find_by_id(&self, id: UserId) -> MeridianResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, longitude, latitude, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> MeridianResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, longitude, latitude, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn exists_by_email(&self, email: &str) -> MeridianResult<bool> {
        let result: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) LIMIT 1")
                .bind(email)
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }
}

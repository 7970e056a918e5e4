//! Remote key-value store contract and its Redis implementation.

use async_trait::async_trait;
use deadpool_redis::Pool;
use meridian_core::{MeridianError, MeridianResult};
use redis::AsyncCommands;
use std::time::Duration;

/// Contract of the remote key-value store consumed by the cache layer.
///
/// Besides plain get/set/delete with TTL, the store maintains ranking
/// indexes: ordered mappings from key to a numeric score with atomic
/// increment and pop-lowest operations. All mutation safety is delegated to
/// the store's atomic primitives; there is no client-side locking.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Writes a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> MeridianResult<()>;

    /// Reads a value. Returns `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> MeridianResult<Option<String>>;

    /// Removes a value.
    async fn delete(&self, key: &str) -> MeridianResult<()>;

    /// Atomically adds `delta` to the key's score in the given index,
    /// inserting the key when absent.
    async fn increment_score(&self, index: &str, key: &str, delta: f64) -> MeridianResult<f64>;

    /// Returns the number of keys in the given index.
    async fn cardinality(&self, index: &str) -> MeridianResult<i64>;

    /// Atomically removes and returns the `count` lowest-scored entries of
    /// the given index. Ties are broken by the store's own stable order.
    async fn pop_lowest_scored(
        &self,
        index: &str,
        count: i64,
    ) -> MeridianResult<Vec<(String, f64)>>;

    /// Removes a key from the given index.
    async fn remove_from_index(&self, index: &str, key: &str) -> MeridianResult<()>;
}

/// Redis-backed remote store.
pub struct RedisRemoteStore {
    pool: Pool,
}

impl RedisRemoteStore {
    /// Creates a new Redis remote store over a connection pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> MeridianResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| MeridianError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl RemoteStore for RedisRemoteStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> MeridianResult<()> {
        let mut conn = self.conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| MeridianError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> MeridianResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| MeridianError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(value)
    }

    async fn delete(&self, key: &str) -> MeridianResult<()> {
        let mut conn = self.conn().await?;
        let _: i64 = conn
            .del(key)
            .await
            .map_err(|e| MeridianError::Cache(format!("Failed to delete key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn increment_score(&self, index: &str, key: &str, delta: f64) -> MeridianResult<f64> {
        let mut conn = self.conn().await?;
        let score: f64 = conn.zincr(index, key, delta).await.map_err(|e| {
            MeridianError::Cache(format!(
                "Failed to increment key '{}' in index '{}': {}",
                key, index, e
            ))
        })?;

        Ok(score)
    }

    async fn cardinality(&self, index: &str) -> MeridianResult<i64> {
        let mut conn = self.conn().await?;
        let count: i64 = conn.zcard(index).await.map_err(|e| {
            MeridianError::Cache(format!("Failed to read cardinality of '{}': {}", index, e))
        })?;

        Ok(count)
    }

    async fn pop_lowest_scored(
        &self,
        index: &str,
        count: i64,
    ) -> MeridianResult<Vec<(String, f64)>> {
        let mut conn = self.conn().await?;
        let popped: Vec<(String, f64)> =
            conn.zpopmin(index, count as isize).await.map_err(|e| {
                MeridianError::Cache(format!("Failed to pop min from '{}': {}", index, e))
            })?;

        Ok(popped)
    }

    async fn remove_from_index(&self, index: &str, key: &str) -> MeridianResult<()> {
        let mut conn = self.conn().await?;
        let _: i64 = conn.zrem(index, key).await.map_err(|e| {
            MeridianError::Cache(format!(
                "Failed to remove key '{}' from index '{}': {}",
                key, index, e
            ))
        })?;

        Ok(())
    }
}

//! User-record cache backed by the LFU cache.

use crate::{keys, LfuCache};
use async_trait::async_trait;
use meridian_core::{MeridianResult, User, UserId};
use tracing::error;

/// Cache of full user records, keyed by user ID.
///
/// `get` is deliberately infallible: a cache failure is a degraded-
/// performance event, not a correctness one, so read errors are logged and
/// reported as a miss and the caller falls through to the catalogue. `set`
/// stays fallible because a capacity-check failure must fail the write.
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Looks up a cached user record. Returns `None` on miss, expiry, or a
    /// logged cache failure.
    async fn get(&self, id: UserId) -> Option<User>;

    /// Caches a user record.
    async fn set(&self, user: &User) -> MeridianResult<()>;

    /// Drops the cached record for a user after a mutation.
    async fn invalidate(&self, id: UserId) -> MeridianResult<()>;
}

/// LFU-backed user cache storing records as JSON.
pub struct LfuUserCache {
    cache: LfuCache,
}

impl LfuUserCache {
    /// Creates a new user cache over an LFU cache.
    #[must_use]
    pub fn new(cache: LfuCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl UserCache for LfuUserCache {
    async fn get(&self, id: UserId) -> Option<User> {
        let key = keys::user_by_id(id);

        let value = match self.cache.get(&key).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to get user {} from cache: {}", id, e);
                return None;
            }
        };

        match serde_json::from_str(&value) {
            Ok(user) => Some(user),
            Err(e) => {
                error!("Failed to deserialize cached user {}: {}", id, e);
                None
            }
        }
    }

    async fn set(&self, user: &User) -> MeridianResult<()> {
        let key = keys::user_by_id(user.id);
        let value = serde_json::to_string(user)?;

        self.cache.set(&key, &value).await
    }

    async fn invalidate(&self, id: UserId) -> MeridianResult<()> {
        let key = keys::user_by_id(id);
        self.cache.delete(&key).await
    }
}

/// No-op user cache for deployments with Redis disabled.
pub struct NoopUserCache;

#[async_trait]
impl UserCache for NoopUserCache {
    async fn get(&self, _id: UserId) -> Option<User> {
        None
    }

    async fn set(&self, _user: &User) -> MeridianResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _id: UserId) -> MeridianResult<()> {
        Ok(())
    }
}

//! Redis connection pool management.

use deadpool_redis::{Pool, PoolConfig, Runtime};
use meridian_config::RedisConfig;
use meridian_core::{MeridianError, MeridianResult};
use tracing::{info, warn};

/// Creates a Redis connection pool and verifies connectivity.
///
/// Connection establishment is retried a bounded number of times at
/// startup; individual cache operations are never retried.
pub async fn create_redis_pool(config: &RedisConfig) -> MeridianResult<Pool> {
    info!("Connecting to Redis...");

    let mut cfg = deadpool_redis::Config::from_url(&config.url);
    cfg.pool = Some(PoolConfig::new(config.pool_size as usize));

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| MeridianError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    let mut remaining = config.connect_attempts.max(1);
    loop {
        match ping(&pool).await {
            Ok(()) => break,
            Err(e) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(MeridianError::Cache(format!(
                        "All attempts exceeded, failed to connect to Redis: {}",
                        e
                    )));
                }
                warn!("Failed to connect to Redis, retrying...");
                tokio::time::sleep(config.connect_retry()).await;
            }
        }
    }

    info!("Redis connection pool established");
    Ok(pool)
}

async fn ping(pool: &Pool) -> MeridianResult<()> {
    let mut conn = pool
        .get()
        .await
        .map_err(|e| MeridianError::Cache(format!("Failed to get Redis connection: {}", e)))?;

    let _: String = redis::cmd("PING")
        .query_async(&mut *conn)
        .await
        .map_err(|e| MeridianError::Cache(format!("Ping failed: {}", e)))?;

    Ok(())
}

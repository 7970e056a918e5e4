//! # Meridian Server
//!
//! Main entry point for the Meridian profile/photo service.

use meridian_blob::{build_object_store, ObjectPhotoStore, PhotoStore};
use meridian_cache::{
    create_redis_pool, LfuCache, LfuUserCache, NoopUserCache, RedisRemoteStore, UserCache,
};
use meridian_config::ConfigLoader;
use meridian_core::{MeridianError, MeridianResult};
use meridian_repository::{create_pool, PgPhotoRepository, PgUserRepository};
use meridian_rest::{create_router, AppState};
use meridian_service::{PhotoServiceImpl, UserServiceImpl};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // The tracing subscriber is owned by the entry point; components only
    // emit through the facade.
    init_logging();

    info!("Starting Meridian server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> MeridianResult<()> {
    // Load configuration
    let config = ConfigLoader::from_default_location().load()?;
    info!("Environment: {}", config.app.environment);

    // Connect to PostgreSQL and apply migrations
    let db_pool = create_pool(&config.database).await?;
    db_pool.run_migrations().await?;

    // Connect to Redis (bounded retry at startup only)
    let user_cache: Arc<dyn UserCache> = if config.redis.enabled {
        let redis_pool = create_redis_pool(&config.redis).await?;
        let remote = Arc::new(RedisRemoteStore::new(redis_pool));
        let lfu = LfuCache::new(remote, config.cache.capacity, config.cache.ttl());
        Arc::new(LfuUserCache::new(lfu))
    } else {
        info!("Redis disabled; user cache is a no-op");
        Arc::new(NoopUserCache)
    };

    // Build the object store client
    let object_store = build_object_store(&config.object_storage)?;
    let photo_store: Arc<dyn PhotoStore> = Arc::new(ObjectPhotoStore::new(
        object_store,
        config.object_storage.public_base_url.clone(),
        config.object_storage.exists_timeout(),
    ));

    // Wire components by constructor injection
    let user_repository = Arc::new(PgUserRepository::new(Arc::clone(&db_pool)));
    let photo_repository = Arc::new(PgPhotoRepository::new(Arc::clone(&db_pool)));

    let user_service = Arc::new(UserServiceImpl::new(
        user_repository,
        Arc::clone(&user_cache),
    ));
    let photo_service = Arc::new(
        PhotoServiceImpl::new(
            photo_repository,
            photo_store,
            user_cache,
            config.photos.max_per_user,
        )
        .with_upload_concurrency(config.photos.upload_concurrency),
    );

    let state = AppState::new(user_service, photo_service);
    let router = create_router(state, &config.server);

    // Start HTTP server
    let addr = config.server.addr();
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MeridianError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeridianError::Internal(format!("Server error: {}", e)))?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meridian=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flixrec_api::{
    config::{CatalogSource, Config},
    db::{self, Cache},
    routes::{create_router, AppState},
    services::{
        catalog::{FileCatalogStore, HttpCatalogStore, PostgresCatalogStore},
        CatalogStore, RecommendationEngine,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flixrec_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = create_store(&config).await?;
    let engine = Arc::new(RecommendationEngine::new(store));

    // A broken catalog should not keep the server down; /engine/refresh retries
    if let Err(e) = engine.initialize().await {
        tracing::warn!(error = %e, "Initial snapshot build failed, serving 503 until refreshed");
    }

    let mut state = AppState::new(
        engine,
        config.default_recommendation_count,
        config.max_recommendation_count,
    );

    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let client = db::create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client);
        state = state.with_cache(cache, config.cache_ttl_secs);
        cache_writer = Some(handle);
        tracing::info!(ttl_secs = config.cache_ttl_secs, "Result cache enabled");
    }

    let app = create_router(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn CatalogStore>> {
    let store: Arc<dyn CatalogStore> = match config.catalog_source()? {
        CatalogSource::File => Arc::new(FileCatalogStore::new(&config.catalog_file)),
        CatalogSource::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            if config.run_migrations {
                db::run_migrations(&pool).await?;
            }
            Arc::new(PostgresCatalogStore::new(pool))
        }
        CatalogSource::Http => {
            let url = config
                .catalog_api_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("CATALOG_API_URL is not set"))?;
            Arc::new(HttpCatalogStore::new(url, config.catalog_api_key.clone()))
        }
    };

    tracing::info!(store = store.name(), "Catalog store configured");
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

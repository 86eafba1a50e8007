//! EventDesk - Application Entry Point
//!
//! This is the main entry point for the EventDesk server.

use std::net::SocketAddr;

use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventdesk::{
    build_router, config::CONFIG, db, services::notifier_from_config, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if CONFIG.server.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting EventDesk server...");

    let store = db::open_store(&CONFIG.database).await?;

    let redis = match &CONFIG.redis.url {
        Some(url) => {
            tracing::info!("Connecting to Redis...");
            let client = RedisClient::open(url.as_str())?;
            Some(redis::aio::ConnectionManager::new(client).await?)
        }
        None => {
            tracing::warn!("REDIS_URL not set; rate limiting disabled");
            None
        }
    };

    let notifier = notifier_from_config(&CONFIG.mail)?;

    // Create application state
    let state = AppState::new(store, notifier, redis, CONFIG.clone());
    let app = build_router(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

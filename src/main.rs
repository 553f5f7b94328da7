// src/main.rs

//! # Main Application Entry Point
//!
//! Loads configuration, opens the single Redis connection, builds the shared
//! application state and serves the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thermotify::{
    api::state::AppState,
    config::Config,
    routes::create_router,
    services::{clock::SystemClock, redis_service::RedisStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thermotify=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Load Configuration (.env is optional)
    if let Err(e) = dotenvy::dotenv() {
        info!("No .env file loaded: {}", e);
    }
    let config = Config::from_env().context("invalid configuration")?;

    info!("Starting thermotify backend...");

    // 3. Connect to the store; the process cannot serve without it
    let store = RedisStore::connect(&config.store)
        .await
        .context("failed to connect to Redis")?;

    let state = AppState::new(Arc::new(store), Arc::new(SystemClock));

    // 4. Configure Router
    let app = create_router(state, config.request_timeout);

    // 5. Configure Server Listener
    let addr = config.bind_addr().await?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind TCP listener to {}", addr))?;

    info!("Server listening on http://{}", addr);

    // 6. Run the Server
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

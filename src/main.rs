// src/main.rs
mod config;
mod context;
mod flash;
mod handlers;
mod i18n;
mod middleware;
mod models;
mod routes;
mod services;
mod templates;
mod utils;

use crate::config::Config;
use crate::flash::FlashStore;
use crate::middleware::rate_limit::RateLimiter;
use crate::routes::create_router;
use crate::services::upstream::UpstreamClient;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub flash: FlashStore,
    pub rate_limiter: Arc<RateLimiter>,
    pub upstream: UpstreamClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Kasumi login front...");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Forwarding submissions to {}", config.login_action);

    let flash = FlashStore::new();
    // Credential POSTs: 10 attempts per 5 minutes per client
    let rate_limiter = Arc::new(RateLimiter::new(10, 300));
    let upstream = UpstreamClient::new(
        config.login_action.clone(),
        config.reset_action.clone(),
        config.update_password_action.clone(),
    )?;

    let state = Arc::new(AppState {
        config: config.clone(),
        flash,
        rate_limiter: rate_limiter.clone(),
        upstream,
    });

    // Flash cleanup task
    let flash_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            flash_state.flash.cleanup_expired().await;
            tracing::debug!("Flash cleanup completed");
        }
    });

    // Rate limiter cleanup task
    let rate_limiter_clone = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300)); // 5 minutes
        loop {
            interval.tick().await;
            rate_limiter_clone.cleanup().await;
            tracing::debug!("Rate limiter cleanup completed");
        }
    });

    let app = create_router(state.clone());

    let addr = state.config.server_addr();
    tracing::info!("Kasumi listening on {}", addr);
    tracing::info!("Login page: http://{}/login", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

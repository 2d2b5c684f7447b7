// src/routes.rs
use axum::{
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{pages, submit};
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Credential POSTs sit behind the auth rate limiter.
    let submit_routes = Router::new()
        .route("/login", post(submit::login_submit))
        .route("/reset-credentials", post(submit::reset_credentials_submit))
        .route("/update-password", post(submit::update_password_submit))
        .route_layer(axum::middleware::from_fn(
            crate::middleware::rate_limit::auth_rate_limit,
        ));

    Router::new()
        .route("/", get(root))
        .route("/login", get(pages::login_page))
        .route("/reset-credentials", get(pages::reset_credentials_page))
        .route("/update-password", get(pages::update_password_page))
        .merge(submit_routes)
        .route("/healthz", get(health_check))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state.clone())
        .layer(Extension(state.rate_limiter.clone()))
        .layer(axum::middleware::from_fn(
            crate::middleware::security::security_headers,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Redirect {
    Redirect::to("/login")
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

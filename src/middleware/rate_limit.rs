// src/middleware/rate_limit.rs
use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Fixed-window per-client limiter guarding the credential POSTs.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
    max_requests: usize,
    window: Duration,
}

struct RateLimitEntry {
    count: usize,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub async fn check(&self, key: &str) -> Result<(), ()> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        let entry = requests
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                window_start: now,
            });

        // Reset window if expired
        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            return Err(());
        }

        entry.count += 1;
        Ok(())
    }

    /// Cleanup old entries periodically (call this in a background task)
    pub async fn cleanup(&self) {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        requests.retain(|_, entry| now.duration_since(entry.window_start) <= self.window);
    }
}

/// Extract client identifier from request
fn extract_client_id(headers: &HeaderMap, peer: Option<&SocketAddr>) -> String {
    // Real IP from headers first (reverse proxy setups)
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Limiter middleware for the form-submission routes. The shared
/// limiter instance arrives via Extension so the window survives
/// across requests.
pub async fn auth_rate_limit(
    Extension(limiter): Extension<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let peer = request
        .extensions()
        .get::<axum::extract::ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client_id = extract_client_id(request.headers(), peer.as_ref());

    match limiter.check(&client_id).await {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!(
                "Auth rate limit exceeded for client: {} on path: {}",
                client_id,
                request.uri().path()
            );
            Err(StatusCode::TOO_MANY_REQUESTS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiting() {
        let limiter = RateLimiter::new(5, 60);

        // First 5 requests should succeed
        for _ in 0..5 {
            assert!(limiter.check("test_client").await.is_ok());
        }

        // 6th request should fail
        assert!(limiter.check("test_client").await.is_err());
    }

    #[tokio::test]
    async fn test_window_reset() {
        let limiter = RateLimiter::new(2, 1); // 2 requests per 1 second

        assert!(limiter.check("test").await.is_ok());
        assert!(limiter.check("test").await.is_ok());
        assert!(limiter.check("test").await.is_err());

        // Wait for window to reset
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(limiter.check("test").await.is_ok());
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, 60);

        assert!(limiter.check("a").await.is_ok());
        assert!(limiter.check("b").await.is_ok());
        assert!(limiter.check("a").await.is_err());
    }
}

// src/services/upstream.rs
use std::time::Duration;

use anyhow::Context;
use reqwest::{redirect::Policy, StatusCode};
use tracing::{info, warn};
use url::Url;

/// Classified result of forwarding a form to the identity server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// The flow continues; send the browser to this location.
    Continue(String),
    /// The identity server rejected the submission.
    Rejected(StatusCode),
}

/// Thin client for the identity server's form-action endpoints. Kasumi
/// never interprets credentials itself; it forwards the validated
/// field set and classifies the response.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    login_action: Url,
    reset_action: Url,
    update_password_action: Url,
}

impl UpstreamClient {
    pub fn new(
        login_action: Url,
        reset_action: Url,
        update_password_action: Url,
    ) -> anyhow::Result<Self> {
        // Redirects are classified, not followed; the Location belongs
        // to the browser.
        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self {
            http,
            login_action,
            reset_action,
            update_password_action,
        })
    }

    pub async fn authenticate(&self, fields: &[(&str, &str)]) -> anyhow::Result<UpstreamOutcome> {
        self.forward(self.login_action.clone(), fields).await
    }

    pub async fn reset_credentials(
        &self,
        fields: &[(&str, &str)],
    ) -> anyhow::Result<UpstreamOutcome> {
        self.forward(self.reset_action.clone(), fields).await
    }

    pub async fn update_password(
        &self,
        fields: &[(&str, &str)],
    ) -> anyhow::Result<UpstreamOutcome> {
        self.forward(self.update_password_action.clone(), fields).await
    }

    async fn forward(&self, action: Url, fields: &[(&str, &str)]) -> anyhow::Result<UpstreamOutcome> {
        let response = self
            .http
            .post(action.clone())
            .form(fields)
            .send()
            .await
            .with_context(|| format!("Identity server unreachable at {}", action))?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("/login")
                .to_string();
            info!("Upstream continued the flow (status {})", status);
            return Ok(UpstreamOutcome::Continue(location));
        }

        if status.is_success() {
            // Some flows answer 200 with a follow-up page instead of a
            // redirect; treat it as continuation to the login page.
            info!("Upstream answered {} without redirect", status);
            return Ok(UpstreamOutcome::Continue("/login".to_string()));
        }

        warn!("Upstream rejected submission with status {}", status);
        Ok(UpstreamOutcome::Rejected(status))
    }
}

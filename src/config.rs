// src/config.rs
use anyhow::Context;
use std::net::SocketAddr;
use url::Url;

use crate::context::{PageUrls, RealmSettings};
use crate::i18n::Locale;

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub login_action: Url,
    pub reset_action: Url,
    pub update_password_action: Url,
    pub registration_url: Url,
    pub realm: RealmSettings,
    pub default_locale: Locale,
    pub dev_mode: bool,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => value == "true" || value == "1",
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let upstream_base = Url::parse(&env_or("UPSTREAM_BASE_URL", "http://localhost:8080/"))
            .context("UPSTREAM_BASE_URL must be a valid URL")?;

        let join = |name: &str, default: &str| -> anyhow::Result<Url> {
            let path = env_or(name, default);
            upstream_base
                .join(&path)
                .with_context(|| format!("{} must resolve against UPSTREAM_BASE_URL", name))
        };

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "3000")
                .parse()
                .context("PORT must be a number")?,
            login_action: join("LOGIN_ACTION_PATH", "login-actions/authenticate")?,
            reset_action: join("RESET_ACTION_PATH", "login-actions/reset-credentials")?,
            update_password_action: join("UPDATE_PASSWORD_ACTION_PATH", "login-actions/required-action")?,
            registration_url: join("REGISTRATION_PATH", "registration")?,
            realm: RealmSettings {
                password_auth: env_flag("PASSWORD_AUTH_ENABLED", true),
                registration_allowed: env_flag("REGISTRATION_ALLOWED", true),
                remember_me: env_flag("REMEMBER_ME_ALLOWED", true),
                reset_password_allowed: env_flag("RESET_PASSWORD_ALLOWED", true),
                login_with_email: env_flag("LOGIN_WITH_EMAIL", true),
                registration_email_as_username: env_flag("REGISTRATION_EMAIL_AS_USERNAME", false),
                username_hidden: env_flag("USERNAME_HIDDEN", false),
            },
            default_locale: match env_or("DEFAULT_LOCALE", "ja").as_str() {
                "en" => Locale::En,
                _ => Locale::Ja,
            },
            dev_mode: env_flag("DEV_MODE", false),
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid server address")
    }

    /// Links and form actions as seen by the rendered pages.
    pub fn page_urls(&self) -> PageUrls {
        PageUrls {
            login: "/login".to_string(),
            reset_credentials: "/reset-credentials".to_string(),
            update_password: "/update-password".to_string(),
            registration: self.registration_url.to_string(),
        }
    }
}

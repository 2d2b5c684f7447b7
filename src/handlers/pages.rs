// src/handlers/pages.rs
use axum::{
    extract::{RawQuery, State},
    response::Html,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use time::Duration as TimeDuration;

use crate::context::{LoginPrefill, RenderContext};
use crate::flash::{self, QuerySignals, SignalStore};
use crate::i18n::{Catalog, Locale};
use crate::models::{Message, MessageKind, MESSAGE_KEY};
use crate::templates;
use crate::AppState;

pub const FLOW_COOKIE: &str = "kasumi_flow";

fn generate_flow_id() -> String {
    let mut random_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut random_bytes);
    hex::encode(random_bytes)
}

/// Returns the flow id from the cookie, minting one (and adding the
/// cookie to the jar) on first contact.
pub fn ensure_flow(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(FLOW_COOKIE) {
        let flow_id = cookie.value().to_string();
        return (jar, flow_id);
    }

    let flow_id = generate_flow_id();
    let cookie = Cookie::build((FLOW_COOKIE, flow_id.clone()))
        .path("/")
        .max_age(TimeDuration::minutes(30))
        .http_only(true)
        .build();
    (jar.add(cookie), flow_id)
}

/// Shared per-render setup: drain the flow's flash bag, reconcile the
/// three signal sources, and assemble the render context.
async fn prepare(
    state: &Arc<AppState>,
    flow_id: &str,
    query: &QuerySignals,
) -> (RenderContext, Catalog) {
    let mut bag = state.flash.take(flow_id).await;

    // Banner exercise hook for local development.
    if state.config.dev_mode {
        if let Some(text) = &query.test_message {
            let seeded = Message::new(MessageKind::Success, text.clone());
            if let Ok(json) = serde_json::to_string(&seeded) {
                bag.set(MESSAGE_KEY, json);
            }
        }
    }

    let reconciled = flash::reconcile(None, None, query, &mut bag);
    state.flash.restore(flow_id, bag).await;

    let mut ctx = RenderContext::new(state.config.realm.clone(), state.config.page_urls());
    ctx.apply_signals(reconciled);
    ctx.prefill = LoginPrefill {
        username: query.username.clone(),
        remember_me: false,
    };

    let locale = Locale::from_tag(query.locale.as_deref(), state.config.default_locale);
    (ctx, Catalog::new(locale))
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    RawQuery(raw): RawQuery,
) -> (CookieJar, Html<String>) {
    let (jar, flow_id) = ensure_flow(jar);
    let query = flash::parse_query(raw.as_deref());
    let (ctx, catalog) = prepare(&state, &flow_id, &query).await;
    (jar, Html(templates::login::render(&ctx, &catalog)))
}

pub async fn reset_credentials_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    RawQuery(raw): RawQuery,
) -> (CookieJar, Html<String>) {
    let (jar, flow_id) = ensure_flow(jar);
    let query = flash::parse_query(raw.as_deref());
    let (ctx, catalog) = prepare(&state, &flow_id, &query).await;
    (jar, Html(templates::reset_credentials::render(&ctx, &catalog)))
}

pub async fn update_password_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    RawQuery(raw): RawQuery,
) -> (CookieJar, Html<String>) {
    let (jar, flow_id) = ensure_flow(jar);
    let query = flash::parse_query(raw.as_deref());
    let (ctx, catalog) = prepare(&state, &flow_id, &query).await;
    (jar, Html(templates::update_password::render(&ctx, &catalog)))
}

// src/handlers/submit.rs
use axum::{
    extract::{Form, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::handlers::pages::ensure_flow;
use crate::i18n::Catalog;
use crate::models::{DateParts, ErrorSignal, Message, MessageKind, ERROR_KEY, MESSAGE_KEY};
use crate::services::upstream::UpstreamOutcome;
use crate::utils::validation;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "rememberMe", default)]
    pub remember_me: Option<String>,
    #[serde(rename = "credentialId", default)]
    pub credential_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetCredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(rename = "lastNameKana", default)]
    #[validate(length(max = 20), regex = "validation::KATAKANA_REGEX")]
    pub last_name_kana: String,
    #[serde(rename = "firstNameKana", default)]
    #[validate(length(max = 20), regex = "validation::KATAKANA_REGEX")]
    pub first_name_kana: String,
    #[serde(rename = "birthYear", default)]
    pub birth_year: String,
    #[serde(rename = "birthMonth", default)]
    pub birth_month: String,
    #[serde(rename = "birthDay", default)]
    pub birth_day: String,
    // Client-maintained composite; recomputed server-side before
    // forwarding.
    #[serde(rename = "birthDateFormatted", default)]
    pub birth_date_formatted: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordForm {
    #[serde(rename = "password-new", default)]
    pub password_new: String,
    #[serde(rename = "password-confirm", default)]
    pub password_confirm: String,
}

async fn flash_error(state: &Arc<AppState>, flow_id: &str, error: ErrorSignal) {
    if let Ok(json) = serde_json::to_string(&error) {
        state.flash.put(flow_id, ERROR_KEY, json).await;
    }
}

async fn flash_message(state: &Arc<AppState>, flow_id: &str, message: Message) {
    if let Ok(json) = serde_json::to_string(&message) {
        state.flash.put(flow_id, MESSAGE_KEY, json).await;
    }
}

fn retry_url(page: &str, username: &str) -> String {
    if username.is_empty() {
        page.to_string()
    } else {
        format!("{}?username={}", page, urlencoding::encode(username))
    }
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Redirect) {
    let (jar, flow_id) = ensure_flow(jar);
    let catalog = Catalog::new(state.config.default_locale);

    let credential_id = form.credential_id.as_deref().unwrap_or("");
    let mut fields = vec![
        ("username", form.username.as_str()),
        ("password", form.password.as_str()),
        ("credentialId", credential_id),
    ];
    if form.remember_me.is_some() {
        fields.push(("rememberMe", "on"));
    }

    match state.upstream.authenticate(&fields).await {
        Ok(UpstreamOutcome::Continue(location)) => (jar, Redirect::to(&location)),
        Ok(UpstreamOutcome::Rejected(_)) => {
            flash_error(
                &state,
                &flow_id,
                ErrorSignal::tagged(catalog.msg("invalidCredentials"), "username"),
            )
            .await;
            (jar, Redirect::to(&retry_url("/login", &form.username)))
        }
        Err(err) => {
            tracing::error!("Login forwarding failed: {:#}", err);
            flash_error(
                &state,
                &flow_id,
                ErrorSignal::new(catalog.msg("internalError")),
            )
            .await;
            (jar, Redirect::to(&retry_url("/login", &form.username)))
        }
    }
}

pub async fn reset_credentials_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ResetCredentialsForm>,
) -> (CookieJar, Redirect) {
    let (jar, flow_id) = ensure_flow(jar);
    let catalog = Catalog::new(state.config.default_locale);
    let back = retry_url("/reset-credentials", &form.username);

    // The browser masks these at the keystroke level; re-check the
    // final values before anything leaves this service.
    if form.validate().is_err() {
        let tag = if validation::validate_kana(&form.last_name_kana).is_err() {
            "lastNameKana"
        } else {
            "firstNameKana"
        };
        flash_error(
            &state,
            &flow_id,
            ErrorSignal::tagged(catalog.msg("invalidKanaField"), tag),
        )
        .await;
        return (jar, Redirect::to(&back));
    }

    let parts = DateParts::new(
        form.birth_year.clone(),
        form.birth_month.clone(),
        form.birth_day.clone(),
    );
    if validation::validate_birth_date(&parts).is_err() {
        flash_error(
            &state,
            &flow_id,
            ErrorSignal::tagged(catalog.msg("invalidBirthDate"), "birthDate"),
        )
        .await;
        return (jar, Redirect::to(&back));
    }

    let birth_date = parts.formatted();
    if !form.birth_date_formatted.is_empty() && form.birth_date_formatted != birth_date {
        tracing::debug!("Client-composed birth date differs; forwarding the server-derived value");
    }
    let fields = vec![
        ("username", form.username.as_str()),
        ("firstNameKana", form.first_name_kana.as_str()),
        ("lastNameKana", form.last_name_kana.as_str()),
        ("birthDateFormatted", birth_date.as_str()),
    ];

    match state.upstream.reset_credentials(&fields).await {
        // The identity server is deliberately opaque about unknown
        // accounts; a rejection still reads as "instructions sent".
        Ok(UpstreamOutcome::Continue(_)) | Ok(UpstreamOutcome::Rejected(_)) => {
            flash_message(
                &state,
                &flow_id,
                Message::new(MessageKind::Success, catalog.msg("resetEmailSent")),
            )
            .await;
            (jar, Redirect::to("/login"))
        }
        Err(err) => {
            tracing::error!("Reset forwarding failed: {:#}", err);
            flash_error(
                &state,
                &flow_id,
                ErrorSignal::new(catalog.msg("internalError")),
            )
            .await;
            (jar, Redirect::to(&back))
        }
    }
}

pub async fn update_password_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<UpdatePasswordForm>,
) -> (CookieJar, Redirect) {
    let (jar, flow_id) = ensure_flow(jar);
    let catalog = Catalog::new(state.config.default_locale);

    if form.password_new.is_empty() || form.password_new != form.password_confirm {
        flash_error(
            &state,
            &flow_id,
            ErrorSignal::tagged(catalog.msg("notMatchPassword"), "password-confirm"),
        )
        .await;
        return (jar, Redirect::to("/update-password"));
    }

    let fields = vec![
        ("password-new", form.password_new.as_str()),
        ("password-confirm", form.password_confirm.as_str()),
    ];

    match state.upstream.update_password(&fields).await {
        Ok(UpstreamOutcome::Continue(_)) => {
            flash_message(
                &state,
                &flow_id,
                Message::new(MessageKind::Success, catalog.msg("passwordUpdated")),
            )
            .await;
            (jar, Redirect::to("/login"))
        }
        Ok(UpstreamOutcome::Rejected(_)) => {
            flash_error(
                &state,
                &flow_id,
                ErrorSignal::tagged(catalog.msg("invalidPasswordMessage"), "password-new"),
            )
            .await;
            (jar, Redirect::to("/update-password"))
        }
        Err(err) => {
            tracing::error!("Password update forwarding failed: {:#}", err);
            flash_error(
                &state,
                &flow_id,
                ErrorSignal::new(catalog.msg("internalError")),
            )
            .await;
            (jar, Redirect::to("/update-password"))
        }
    }
}

// src/context.rs
use std::collections::HashMap;

use crate::flash::Reconciled;
use crate::models::{ErrorSignal, Message};

// Error tags that name a form field; anything else goes to the banner.
const FIELD_TAGS: &[&str] = &[
    "username",
    "password",
    "password-new",
    "password-confirm",
    "firstNameKana",
    "lastNameKana",
    "birthDate",
];

/// Realm feature flags, as supplied by the identity-server
/// integration. The pages treat these as opaque inputs.
#[derive(Debug, Clone)]
pub struct RealmSettings {
    pub password_auth: bool,
    pub registration_allowed: bool,
    pub remember_me: bool,
    pub reset_password_allowed: bool,
    pub login_with_email: bool,
    pub registration_email_as_username: bool,
    pub username_hidden: bool,
}

impl RealmSettings {
    /// Catalog key for the username label on the login form.
    pub fn username_label_key(&self) -> &'static str {
        if !self.login_with_email {
            "username"
        } else if !self.registration_email_as_username {
            "usernameOrEmail"
        } else {
            "email"
        }
    }
}

/// Links and form actions for the current render. Forms post back to
/// the page's own path; registration is an upstream-hosted page.
#[derive(Debug, Clone)]
pub struct PageUrls {
    pub login: String,
    pub reset_credentials: String,
    pub update_password: String,
    pub registration: String,
}

/// Per-field validation errors reported by collaborators.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.errors.insert(field.into(), text.into());
    }

    pub fn exists_error(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| self.errors.contains_key(*f))
    }

    pub fn get_first_error(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .find_map(|f| self.errors.get(*f).map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginPrefill {
    pub username: Option<String>,
    pub remember_me: bool,
}

/// Everything a page template needs for one render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub realm: RealmSettings,
    pub urls: PageUrls,
    pub message: Option<Message>,
    pub error: Option<ErrorSignal>,
    pub field_errors: FieldErrors,
    pub prefill: LoginPrefill,
    pub selected_credential: Option<String>,
}

impl RenderContext {
    pub fn new(realm: RealmSettings, urls: PageUrls) -> Self {
        Self {
            realm,
            urls,
            message: None,
            error: None,
            field_errors: FieldErrors::default(),
            prefill: LoginPrefill::default(),
            selected_credential: None,
        }
    }

    /// Attaches the reconciler's output. A field-tagged error feeds the
    /// per-field accessor; everything else lands in the banner.
    pub fn apply_signals(&mut self, reconciled: Reconciled) {
        self.message = reconciled.message;
        match reconciled.error {
            Some(error) => match error.tag.as_deref() {
                Some(tag) if FIELD_TAGS.contains(&tag) => {
                    self.field_errors.insert(tag.to_string(), error.text);
                }
                _ => self.error = Some(error),
            },
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageKind;

    fn realm() -> RealmSettings {
        RealmSettings {
            password_auth: true,
            registration_allowed: true,
            remember_me: true,
            reset_password_allowed: true,
            login_with_email: true,
            registration_email_as_username: false,
            username_hidden: false,
        }
    }

    fn urls() -> PageUrls {
        PageUrls {
            login: "/login".to_string(),
            reset_credentials: "/reset-credentials".to_string(),
            update_password: "/update-password".to_string(),
            registration: "http://idp.example/registration".to_string(),
        }
    }

    #[test]
    fn test_username_label_key() {
        let mut settings = realm();
        assert_eq!(settings.username_label_key(), "usernameOrEmail");

        settings.login_with_email = false;
        assert_eq!(settings.username_label_key(), "username");

        settings.login_with_email = true;
        settings.registration_email_as_username = true;
        assert_eq!(settings.username_label_key(), "email");
    }

    #[test]
    fn test_field_errors_accessors() {
        let mut errors = FieldErrors::default();
        assert!(!errors.exists_error(&["username", "password"]));

        errors.insert("password", "wrong");
        assert!(errors.exists_error(&["username", "password"]));
        assert_eq!(errors.get_first_error(&["username", "password"]), Some("wrong"));
        assert_eq!(errors.get_first_error(&["password-new"]), None);
    }

    #[test]
    fn test_apply_signals_routes_field_tagged_error() {
        let mut ctx = RenderContext::new(realm(), urls());
        ctx.apply_signals(Reconciled {
            error: Some(ErrorSignal::tagged("bad creds", "username")),
            ..Default::default()
        });

        assert!(ctx.error.is_none());
        assert!(ctx.field_errors.exists_error(&["username"]));
    }

    #[test]
    fn test_apply_signals_routes_untagged_error_to_banner() {
        let mut ctx = RenderContext::new(realm(), urls());
        ctx.apply_signals(Reconciled {
            error: Some(ErrorSignal::new("upstream unreachable")),
            ..Default::default()
        });

        assert_eq!(ctx.error.as_ref().unwrap().text, "upstream unreachable");
        assert!(ctx.field_errors.is_empty());
    }

    #[test]
    fn test_apply_signals_message_passthrough() {
        let mut ctx = RenderContext::new(realm(), urls());
        ctx.apply_signals(Reconciled {
            message: Some(Message::new(MessageKind::Success, "done")),
            ..Default::default()
        });

        assert_eq!(ctx.message.as_ref().unwrap().text, "done");
    }
}

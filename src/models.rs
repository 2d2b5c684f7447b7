// src/models.rs
use serde::{Deserialize, Serialize};

// Flash keys consumed by the reconciler. The names are part of the
// external contract with the identity-server integration and must not
// change independently of it.
pub const MESSAGE_KEY: &str = "keycloak_message";
pub const ERROR_KEY: &str = "keycloak_error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Warning,
    Info,
}

impl MessageKind {
    /// CSS class suffix used by the banner template.
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Warning => "warning",
            MessageKind::Info => "info",
        }
    }
}

/// A display-ready banner message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<String>>,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            params: None,
        }
    }

    /// Interpolates `{0}`, `{1}`, ... placeholders with the attached
    /// parameters. Text without placeholders passes through unchanged.
    pub fn format(&self) -> String {
        let Some(params) = &self.params else {
            return self.text.clone();
        };
        let mut out = self.text.clone();
        for (i, param) in params.iter().enumerate() {
            out = out.replace(&format!("{{{}}}", i), param);
        }
        out
    }
}

/// An error reported by a collaborator (upstream rejection, decode
/// failure relay). When `tag` names a form field the error renders
/// inline at that field instead of in the banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSignal {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ErrorSignal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }

    pub fn tagged(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: Some(tag.into()),
        }
    }
}

/// Origin of a reconciled signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    RenderContext,
    QueryParameter,
    SessionStore,
}

/// The three birth-date sub-fields as entered. Bounds are enforced at
/// the edit boundary (see utils::validation), not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateParts {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl DateParts {
    pub fn new(year: impl Into<String>, month: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
            day: day.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.year.is_empty() && !self.month.is_empty() && !self.day.is_empty()
    }

    /// Zero-padded `YYYY-MM-DD` composite for submission.
    pub fn formatted(&self) -> String {
        format!("{:0>4}-{:0>2}-{:0>2}", self.year, self.month, self.day)
    }
}

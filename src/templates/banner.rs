// src/templates/banner.rs
use super::html_escape;
use crate::models::{ErrorSignal, Message};

/// Renders the reconciled message/error pair above the form card.
/// Absent signals render nothing; an error is shown before a message.
pub fn render(message: Option<&Message>, error: Option<&ErrorSignal>) -> String {
    let mut out = String::new();

    if let Some(error) = error {
        out.push_str(&format!(
            r#"<div class="banner banner-error" role="alert">{}</div>"#,
            html_escape(&error.text)
        ));
    }

    if let Some(message) = message {
        out.push_str(&format!(
            r#"<div class="banner banner-{}" role="status">{}</div>"#,
            message.kind.css_class(),
            html_escape(&message.format())
        ));
    }

    out
}

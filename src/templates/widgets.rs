// src/templates/widgets.rs
use super::html_escape;
use crate::context::FieldErrors;
use crate::i18n::Catalog;

/// Visibility state of one password input. Purely local UI state; the
/// static script replays these transitions in the browser against the
/// same input id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordToggle {
    input_id: String,
    revealed: bool,
}

impl PasswordToggle {
    pub fn new(input_id: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            revealed: false,
        }
    }

    pub fn input_id(&self) -> &str {
        &self.input_id
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The flipped state.
    pub fn toggled(self) -> Self {
        Self {
            revealed: !self.revealed,
            ..self
        }
    }

    /// Rendering mode of the underlying input.
    pub fn input_type(&self) -> &'static str {
        if self.revealed {
            "text"
        } else {
            "password"
        }
    }

    /// Catalog key for the accessible label describing what the next
    /// activation will do.
    pub fn label_key(&self) -> &'static str {
        if self.revealed {
            "hidePassword"
        } else {
            "showPassword"
        }
    }
}

/// A password input wrapped with its visibility-toggle button.
pub fn password_field(
    toggle: &PasswordToggle,
    name: &str,
    tab_index: u32,
    autocomplete: &str,
    placeholder: &str,
    autofocus: bool,
    aria_invalid: bool,
    catalog: &Catalog,
) -> String {
    let autofocus_attr = if autofocus { " autofocus" } else { "" };
    format!(
        r#"<div class="password-wrapper">
                <input tabindex="{tab}" id="{id}" name="{name}" type="{ty}" autocomplete="{ac}"
                       placeholder="{ph}" aria-invalid="{invalid}"{autofocus}>
                <button type="button" class="toggle-visibility" data-toggle-target="{id}"
                        data-label-show="{show}" data-label-hide="{hide}"
                        aria-label="{label}" aria-controls="{id}">👁</button>
            </div>"#,
        tab = tab_index,
        id = toggle.input_id(),
        name = name,
        ty = toggle.input_type(),
        ac = autocomplete,
        ph = html_escape(placeholder),
        invalid = aria_invalid,
        autofocus = autofocus_attr,
        show = html_escape(catalog.msg("showPassword")),
        hide = html_escape(catalog.msg("hidePassword")),
        label = html_escape(catalog.msg(toggle.label_key())),
    )
}

/// Inline field-level error text, as reported by the collaborator.
pub fn field_error(errors: &FieldErrors, fields: &[&str], id: &str) -> String {
    match errors.get_first_error(fields) {
        Some(text) => format!(
            r#"<span id="{}" class="input-error" aria-live="polite">{}</span>"#,
            id,
            html_escape(text)
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    #[test]
    fn test_toggle_transitions() {
        let toggle = PasswordToggle::new("password");
        assert!(!toggle.is_revealed());
        assert_eq!(toggle.input_type(), "password");
        assert_eq!(toggle.label_key(), "showPassword");

        let revealed = toggle.toggled();
        assert!(revealed.is_revealed());
        assert_eq!(revealed.input_type(), "text");
        assert_eq!(revealed.label_key(), "hidePassword");

        // Round trip.
        assert_eq!(revealed.toggled(), PasswordToggle::new("password"));
    }

    #[test]
    fn test_password_field_targets_one_input() {
        let toggle = PasswordToggle::new("password-new");
        let catalog = Catalog::new(Locale::En);
        let html = password_field(&toggle, "password-new", 1, "new-password", "", true, false, &catalog);

        assert!(html.contains(r#"data-toggle-target="password-new""#));
        assert!(html.contains(r#"aria-controls="password-new""#));
        assert!(html.contains(r#"type="password""#));
        assert!(html.contains(r#"aria-label="Show password""#));
    }

    #[test]
    fn test_field_error_rendering() {
        let mut errors = FieldErrors::default();
        assert_eq!(field_error(&errors, &["username"], "input-error"), "");

        errors.insert("username", "bad & wrong");
        let html = field_error(&errors, &["username", "password"], "input-error");
        assert!(html.contains("bad &amp; wrong"));
        assert!(html.contains(r#"id="input-error""#));
    }
}

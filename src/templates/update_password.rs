// src/templates/update_password.rs
use super::widgets::{field_error, password_field, PasswordToggle};
use super::{banner, html_escape, render_page};
use crate::context::RenderContext;
use crate::i18n::Catalog;

fn password_group(
    ctx: &RenderContext,
    catalog: &Catalog,
    id: &str,
    tab_index: u32,
    label_key: &str,
    autofocus: bool,
) -> String {
    let toggle = PasswordToggle::new(id);
    format!(
        r#"<div class="form-group">
                <label for="{id}">{label}</label>
                {input}
                {error}
            </div>"#,
        id = id,
        label = catalog.msg(label_key),
        input = password_field(
            &toggle,
            id,
            tab_index,
            "new-password",
            catalog.msg(label_key),
            autofocus,
            ctx.field_errors.exists_error(&[id]),
            catalog,
        ),
        error = field_error(&ctx.field_errors, &[id], &format!("input-error-{}", id)),
    )
}

pub fn render(ctx: &RenderContext, catalog: &Catalog) -> String {
    let banner_html = banner::render(ctx.message.as_ref(), ctx.error.as_ref());

    let content = format!(
        r#"<div class="auth-header">
            <h2>{title}</h2>
            <p>{subtitle}</p>
        </div>
        {banner}
        <div class="auth-card">
            <form id="kc-passwd-update-form" class="auth-form" method="post" action="{action}" data-disable-on-submit>
            {password_new}
            {password_confirm}
            <button tabindex="3" class="btn btn-primary btn-full" name="login" id="kc-login" type="submit">{submit}</button>
            </form>
        </div>"#,
        title = catalog.msg("updatePasswordTitle"),
        subtitle = catalog.msg("updatePasswordSubtitle"),
        banner = banner_html,
        action = html_escape(&ctx.urls.update_password),
        password_new = password_group(ctx, catalog, "password-new", 1, "passwordNew", true),
        password_confirm = password_group(ctx, catalog, "password-confirm", 2, "passwordConfirm", false),
        submit = catalog.msg("doUpdatePassword"),
    );

    render_page(
        catalog.msg("updatePasswordTitle"),
        catalog.locale().html_lang(),
        &content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PageUrls, RealmSettings, RenderContext};
    use crate::flash::Reconciled;
    use crate::i18n::Locale;
    use crate::models::ErrorSignal;

    fn context() -> RenderContext {
        RenderContext::new(
            RealmSettings {
                password_auth: true,
                registration_allowed: true,
                remember_me: true,
                reset_password_allowed: true,
                login_with_email: true,
                registration_email_as_username: false,
                username_hidden: false,
            },
            PageUrls {
                login: "/login".to_string(),
                reset_credentials: "/reset-credentials".to_string(),
                update_password: "/update-password".to_string(),
                registration: "http://idp.example/registration".to_string(),
            },
        )
    }

    #[test]
    fn test_renders_both_password_fields() {
        let html = render(&context(), &Catalog::new(Locale::Ja));
        assert!(html.contains(r#"name="password-new""#));
        assert!(html.contains(r#"name="password-confirm""#));
        assert!(html.contains(r#"data-toggle-target="password-new""#));
        assert!(html.contains(r#"data-toggle-target="password-confirm""#));
    }

    #[test]
    fn test_mismatch_error_renders_inline() {
        let mut ctx = context();
        ctx.apply_signals(Reconciled {
            error: Some(ErrorSignal::tagged("no match", "password-confirm")),
            ..Default::default()
        });

        let html = render(&ctx, &Catalog::new(Locale::Ja));
        assert!(html.contains("no match"));
        assert!(html.contains("input-error-password-confirm"));
    }
}

// src/templates/login.rs
use super::widgets::{field_error, password_field, PasswordToggle};
use super::{banner, html_escape, render_page};
use crate::context::RenderContext;
use crate::i18n::Catalog;

pub fn render(ctx: &RenderContext, catalog: &Catalog) -> String {
    let banner_html = banner::render(ctx.message.as_ref(), ctx.error.as_ref());

    let registration_html = if ctx.realm.password_auth && ctx.realm.registration_allowed {
        format!(
            r#"<div class="auth-hint">
            <span>{} <a tabindex="8" href="{}">{}</a></span>
        </div>"#,
            catalog.msg("noAccount"),
            html_escape(&ctx.urls.registration),
            catalog.msg("doRegister"),
        )
    } else {
        String::new()
    };

    let creds_invalid = ctx.field_errors.exists_error(&["username", "password"]);

    let username_html = if ctx.realm.username_hidden {
        String::new()
    } else {
        format!(
            r#"<div class="form-group">
                <label for="username">{}</label>
                <input tabindex="2" id="username" name="username" type="text" value="{}"
                       autofocus autocomplete="username" aria-invalid="{}" placeholder="{}">
                {}
            </div>"#,
            catalog.msg(ctx.realm.username_label_key()),
            html_escape(ctx.prefill.username.as_deref().unwrap_or("")),
            creds_invalid,
            catalog.msg("usernameOrEmail"),
            field_error(&ctx.field_errors, &["username", "password"], "input-error"),
        )
    };

    // With the username hidden the shared credentials error moves under
    // the password field.
    let password_error_html = if ctx.realm.username_hidden {
        field_error(&ctx.field_errors, &["username", "password"], "input-error")
    } else {
        String::new()
    };
    let password_toggle = PasswordToggle::new("password");
    let password_html = format!(
        r#"<div class="form-group">
                <label for="password">{}</label>
                {}
                {}
            </div>"#,
        catalog.msg("password"),
        password_field(
            &password_toggle,
            "password",
            3,
            "current-password",
            catalog.msg("password"),
            ctx.realm.username_hidden,
            creds_invalid,
            catalog,
        ),
        password_error_html,
    );

    let remember_me_html = if ctx.realm.remember_me && !ctx.realm.username_hidden {
        let checked = if ctx.prefill.remember_me { " checked" } else { "" };
        format!(
            r#"<div class="checkbox-group">
                    <input tabindex="5" id="rememberMe" name="rememberMe" type="checkbox"{}>
                    <label for="rememberMe">{}</label>
                </div>"#,
            checked,
            catalog.msg("rememberMe"),
        )
    } else {
        String::new()
    };

    let forgot_html = if ctx.realm.reset_password_allowed {
        format!(
            r#"<div class="form-link">
                    <a tabindex="6" href="{}">{}</a>
                </div>"#,
            html_escape(&ctx.urls.reset_credentials),
            catalog.msg("doForgotPassword"),
        )
    } else {
        String::new()
    };

    let form_html = if ctx.realm.password_auth {
        format!(
            r#"<form id="kc-form-login" class="auth-form" method="post" action="{action}" data-disable-on-submit>
            {username}
            {password}
            <div class="form-row">
                {remember_me}
                {forgot}
            </div>
            <input type="hidden" id="id-hidden-input" name="credentialId" value="{credential}">
            <button tabindex="7" class="btn btn-primary btn-full" name="login" id="kc-login" type="submit">{submit}</button>
        </form>"#,
            action = html_escape(&ctx.urls.login),
            username = username_html,
            password = password_html,
            remember_me = remember_me_html,
            forgot = forgot_html,
            credential = html_escape(ctx.selected_credential.as_deref().unwrap_or("")),
            submit = catalog.msg("doLogIn"),
        )
    } else {
        String::new()
    };

    let content = format!(
        r#"<div class="auth-header">
            <h2>{title}</h2>
            <p>{subtitle}</p>
        </div>
        {banner}
        {registration}
        <div class="auth-card">
            {form}
        </div>"#,
        title = catalog.msg("loginAccountTitle"),
        subtitle = catalog.msg("loginAccountSubtitle"),
        banner = banner_html,
        registration = registration_html,
        form = form_html,
    );

    render_page(
        catalog.msg("loginAccountTitle"),
        catalog.locale().html_lang(),
        &content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LoginPrefill, PageUrls, RealmSettings, RenderContext};
    use crate::i18n::Locale;

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
    fn test_renders_core_fields() {
        let html = render(&context(), &Catalog::new(Locale::Ja));
        assert!(html.contains(r#"name="username""#));
        assert!(html.contains(r#"name="password""#));
        assert!(html.contains(r#"name="rememberMe""#));
        assert!(html.contains(r#"name="credentialId""#));
        assert!(html.contains(r#"action="/login""#));
    }

    #[test]
    fn test_realm_flags_hide_sections() {
        let mut ctx = context();
        ctx.realm.registration_allowed = false;
        ctx.realm.remember_me = false;
        ctx.realm.reset_password_allowed = false;

        let html = render(&ctx, &Catalog::new(Locale::Ja));
        assert!(!html.contains(r#"name="rememberMe""#));
        assert!(!html.contains("/reset-credentials"));
        assert!(!html.contains("registration"));
    }

    #[test]
    fn test_prefill_is_escaped() {
        let mut ctx = context();
        ctx.prefill = LoginPrefill {
            username: Some(r#""><script>"#.to_string()),
            remember_me: true,
        };

        let html = render(&ctx, &Catalog::new(Locale::Ja));
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("checked"));
    }
}

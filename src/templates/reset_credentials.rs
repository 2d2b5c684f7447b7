// src/templates/reset_credentials.rs
use super::widgets::field_error;
use super::{banner, html_escape, render_page};
use crate::context::RenderContext;
use crate::i18n::Catalog;
use crate::utils::validation;

fn kana_input(
    id: &str,
    tab_index: u32,
    autocomplete: &str,
    label: &str,
    placeholder: &str,
) -> String {
    format!(
        r#"<div class="form-group">
                <label for="{id}">{label}</label>
                <input tabindex="{tab}" id="{id}" name="{id}" type="text" autocomplete="{ac}"
                       maxlength="{max}" pattern="[ァ-ヶー]*" placeholder="{ph}" data-kana-guard>
            </div>"#,
        id = id,
        label = label,
        tab = tab_index,
        ac = autocomplete,
        max = validation::KANA_MAX_LEN,
        ph = html_escape(placeholder),
    )
}

fn date_part_input(id: &str, tab_index: u32, max_len: u32, placeholder: &str, min: i32, max: i32, unit: &str) -> String {
    format!(
        r#"<div class="date-part">
                    <input tabindex="{tab}" id="{id}" name="{id}" type="text" maxlength="{len}"
                           placeholder="{ph}" data-numeral-guard data-min="{min}" data-max="{max}">
                    <div class="date-part-label">{unit}</div>
                </div>"#,
        tab = tab_index,
        id = id,
        len = max_len,
        ph = placeholder,
        min = min,
        max = max,
        unit = unit,
    )
}

pub fn render(ctx: &RenderContext, catalog: &Catalog) -> String {
    let banner_html = banner::render(ctx.message.as_ref(), ctx.error.as_ref());

    let username_html = format!(
        r#"<div class="form-group">
                <label for="username">{}</label>
                <input tabindex="1" id="username" name="username" type="text" value="{}"
                       autofocus autocomplete="username" aria-invalid="{}" placeholder="{}">
                {}
            </div>"#,
        catalog.msg("usernameOrEmail"),
        html_escape(ctx.prefill.username.as_deref().unwrap_or("")),
        ctx.field_errors.exists_error(&["username"]),
        catalog.msg("usernameOrEmail"),
        field_error(&ctx.field_errors, &["username"], "input-error"),
    );

    let birth_date_html = format!(
        r#"<div class="form-group">
                <label for="birthYear">{label}</label>
                <div class="date-row">
                {year}
                <div class="date-separator">/</div>
                {month}
                <div class="date-separator">/</div>
                {day}
                </div>
                {error}
                <input type="hidden" id="birthDateFormatted" name="birthDateFormatted" value="">
            </div>"#,
        label = catalog.msg("birthDate"),
        year = date_part_input(
            "birthYear",
            4,
            4,
            "1990",
            validation::BIRTH_YEAR_MIN,
            validation::current_year(),
            catalog.msg("yearLabel"),
        ),
        month = date_part_input(
            "birthMonth",
            5,
            2,
            "01",
            validation::BIRTH_MONTH_MIN,
            validation::BIRTH_MONTH_MAX,
            catalog.msg("monthLabel"),
        ),
        day = date_part_input(
            "birthDay",
            6,
            2,
            "01",
            validation::BIRTH_DAY_MIN,
            validation::BIRTH_DAY_MAX,
            catalog.msg("dayLabel"),
        ),
        error = field_error(&ctx.field_errors, &["birthDate"], "input-error-birth-date"),
    );

    let content = format!(
        r#"<div class="auth-header">
            <h2>{title}</h2>
            <p>{subtitle}</p>
        </div>
        {banner}
        <div class="auth-hint">
            <span>{have_account} <a tabindex="8" href="{login_url}">{back}</a></span>
        </div>
        <div class="auth-card">
            <form id="kc-reset-form" class="auth-form" method="post" action="{action}" data-disable-on-submit>
            {username}
            {last_kana}
            {first_kana}
            {birth_date}
            <button tabindex="7" class="btn btn-primary btn-full" name="login" id="kc-login" type="submit">{submit}</button>
            </form>
        </div>"#,
        title = catalog.msg("resetPasswordTitle"),
        subtitle = catalog.msg("resetPasswordSubtitle"),
        banner = banner_html,
        have_account = catalog.msg("haveAccount"),
        login_url = html_escape(&ctx.urls.login),
        back = catalog.msg("backToLogin"),
        action = html_escape(&ctx.urls.reset_credentials),
        username = username_html,
        last_kana = kana_input(
            "lastNameKana",
            2,
            "family-name",
            catalog.msg("lastNameKana"),
            catalog.msg("lastNameKanaPlaceholder"),
        ),
        first_kana = kana_input(
            "firstNameKana",
            3,
            "given-name",
            catalog.msg("firstNameKana"),
            catalog.msg("firstNameKanaPlaceholder"),
        ),
        birth_date = birth_date_html,
        submit = catalog.msg("doSubmit"),
    );

    render_page(
        catalog.msg("resetPasswordTitle"),
        catalog.locale().html_lang(),
        &content,
    )
}

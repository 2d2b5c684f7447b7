// src/i18n.rs
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Ja,
    En,
}

impl Locale {
    /// Resolves a `kc_locale` query tag, falling back to the given
    /// default for unknown or absent tags.
    pub fn from_tag(tag: Option<&str>, default: Locale) -> Locale {
        match tag {
            Some("ja") => Locale::Ja,
            Some("en") => Locale::En,
            _ => default,
        }
    }

    pub fn html_lang(&self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }
}

static JA_TABLE: &[(&str, &str)] = &[
    ("loginAccountTitle", "アカウントにサインイン"),
    ("loginAccountSubtitle", "アカウントにサインインしてください"),
    ("username", "ユーザー名"),
    ("usernameOrEmail", "ユーザー名またはメールアドレス"),
    ("email", "メールアドレス"),
    ("password", "パスワード"),
    ("rememberMe", "ログイン状態を保持する"),
    ("doLogIn", "サインイン"),
    ("doForgotPassword", "パスワードをお忘れですか？"),
    ("noAccount", "アカウントをお持ちでないですか？"),
    ("doRegister", "新規登録"),
    ("haveAccount", "アカウントをお持ちですか？"),
    ("backToLogin", "ログインに戻る"),
    ("doSubmit", "続行"),
    ("resetPasswordTitle", "パスワードを忘れた場合"),
    ("resetPasswordSubtitle", "パスワードリセットのための情報を入力してください"),
    ("updatePasswordTitle", "新しいパスワードの設定"),
    ("updatePasswordSubtitle", "新しいパスワードを入力してください"),
    ("passwordNew", "新しいパスワード"),
    ("passwordConfirm", "新しいパスワード（確認）"),
    ("doUpdatePassword", "パスワードを更新"),
    ("lastNameKana", "姓（カナ）"),
    ("firstNameKana", "名（カナ）"),
    ("lastNameKanaPlaceholder", "ヤマダ"),
    ("firstNameKanaPlaceholder", "タロウ"),
    ("birthDate", "生年月日"),
    ("yearLabel", "年"),
    ("monthLabel", "月"),
    ("dayLabel", "日"),
    ("showPassword", "パスワードを表示"),
    ("hidePassword", "パスワードを隠す"),
    ("invalidCredentials", "ユーザー名またはパスワードが正しくありません"),
    ("notMatchPassword", "パスワードが一致しません"),
    ("invalidPasswordMessage", "パスワードが要件を満たしていません"),
    ("invalidKanaField", "カナ氏名はカタカナで入力してください"),
    ("invalidBirthDate", "生年月日が正しくありません"),
    ("resetEmailSent", "パスワードリセットの手続きをメールで送信しました"),
    ("passwordUpdated", "パスワードを更新しました"),
    ("internalError", "処理中にエラーが発生しました。しばらくしてからもう一度お試しください"),
];

static EN_TABLE: &[(&str, &str)] = &[
    ("loginAccountTitle", "Sign in to your account"),
    ("loginAccountSubtitle", "Please sign in to continue"),
    ("username", "Username"),
    ("usernameOrEmail", "Username or email"),
    ("email", "Email"),
    ("password", "Password"),
    ("rememberMe", "Remember me"),
    ("doLogIn", "Sign in"),
    ("doForgotPassword", "Forgot your password?"),
    ("noAccount", "Don't have an account?"),
    ("doRegister", "Register"),
    ("haveAccount", "Already have an account?"),
    ("backToLogin", "Back to login"),
    ("doSubmit", "Continue"),
    ("resetPasswordTitle", "Forgot your password"),
    ("resetPasswordSubtitle", "Enter the information below to reset your password"),
    ("updatePasswordTitle", "Set a new password"),
    ("updatePasswordSubtitle", "Enter your new password"),
    ("passwordNew", "New password"),
    ("passwordConfirm", "Confirm new password"),
    ("doUpdatePassword", "Update password"),
    ("lastNameKana", "Family name (kana)"),
    ("firstNameKana", "Given name (kana)"),
    ("lastNameKanaPlaceholder", "ヤマダ"),
    ("firstNameKanaPlaceholder", "タロウ"),
    ("birthDate", "Date of birth"),
    ("yearLabel", "Year"),
    ("monthLabel", "Month"),
    ("dayLabel", "Day"),
    ("showPassword", "Show password"),
    ("hidePassword", "Hide password"),
    ("invalidCredentials", "Invalid username or password"),
    ("notMatchPassword", "Passwords don't match"),
    ("invalidPasswordMessage", "Password does not meet the requirements"),
    ("invalidKanaField", "Kana names must be katakana only"),
    ("invalidBirthDate", "Invalid date of birth"),
    ("resetEmailSent", "Password reset instructions have been sent by email"),
    ("passwordUpdated", "Your password has been updated"),
    ("internalError", "Something went wrong. Please try again later"),
];

lazy_static::lazy_static! {
    static ref JA: HashMap<&'static str, &'static str> = JA_TABLE.iter().copied().collect();
    static ref EN: HashMap<&'static str, &'static str> = EN_TABLE.iter().copied().collect();
}

/// Localized message catalog accessor handed to the templates.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Looks the key up in the active locale, then English, then falls
    /// back to the key itself so a missing entry stays visible instead
    /// of blanking a label.
    pub fn msg<'a>(&self, key: &'a str) -> &'a str {
        let table = match self.locale {
            Locale::Ja => &*JA,
            Locale::En => &*EN,
        };
        if let Some(text) = table.get(key).copied() {
            return text;
        }
        if let Some(text) = EN.get(key).copied() {
            return text;
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ja_lookup() {
        let catalog = Catalog::new(Locale::Ja);
        assert_eq!(catalog.msg("password"), "パスワード");
    }

    #[test]
    fn test_en_lookup() {
        let catalog = Catalog::new(Locale::En);
        assert_eq!(catalog.msg("doLogIn"), "Sign in");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let catalog = Catalog::new(Locale::Ja);
        assert_eq!(catalog.msg("noSuchKey"), "noSuchKey");
    }

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(Locale::from_tag(Some("en"), Locale::Ja), Locale::En);
        assert_eq!(Locale::from_tag(Some("fr"), Locale::Ja), Locale::Ja);
        assert_eq!(Locale::from_tag(None, Locale::En), Locale::En);
    }

    #[test]
    fn test_tables_cover_same_keys() {
        for (key, _) in JA_TABLE {
            assert!(EN.contains_key(key), "missing en entry for {}", key);
        }
        for (key, _) in EN_TABLE {
            assert!(JA.contains_key(key), "missing ja entry for {}", key);
        }
    }
}

// src/templates/layout.rs

/// Common shell for the hosted auth pages: a centered card on a full
/// height background, no site chrome.
pub fn render_page(title: &str, lang: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} - Kasumi</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
    <main class="auth-page">
        <div class="auth-card-column">
            {}
        </div>
    </main>
    <script src="/static/js/form-guards.js" defer></script>
</body>
</html>"#,
        lang, title, content
    )
}

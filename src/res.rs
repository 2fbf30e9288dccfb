use axum::{
    debug_handler,
    http::header,
    response::{Html, IntoResponse},
};
use pulldown_cmark::{CowStr, Event, Parser, Tag};

use crate::{AppError, db::User};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// Escapes text for use in element bodies and double-quoted attributes.
/// Braces are escaped too so user text never reaches a template placeholder.
pub fn escape(text: &str) -> String {
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, std::iter::once(Event::Text(text.into())));
    html.replace('"', "&quot;").replace('{', "&#123;")
}

/// Renders message content. Raw HTML is shown as text and script links are
/// dropped.
pub fn markdown(source: &str) -> String {
    let parser = Parser::new(source).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if is_script_url(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if is_script_url(&dest_url) => {
            Event::Start(Tag::Image { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        _ => event,
    });

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html.replace('{', "&#123;")
}

fn is_script_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("javascript:") || url.starts_with("vbscript:") || url.starts_with("data:")
}

/// Wraps a page body in the site layout.
pub fn page(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav = match user {
        Some(user) => include_res!(str, "/pages/nav_user.html")
            .replace("{user_id}", &user.id.to_string())
            .replace("{username}", &escape(&user.username)),
        None => include_res!(str, "/pages/nav_guest.html").to_owned(),
    };

    Html(
        include_res!(str, "/pages/layout.html")
            .replace("{title}", &escape(title))
            .replace("{nav}", &nav)
            .replace("{body}", body),
    )
}

/// Confirmation page body for deleting `what`; only the form's POST deletes.
pub fn confirm_delete(what: &str, action: &str, back: &str) -> String {
    include_res!(str, "/pages/delete.html")
        .replace("{action}", action)
        .replace("{back}", back)
        .replace("{what}", &escape(what))
}

pub fn error_box(error: Option<&str>) -> String {
    match error {
        Some(error) => format!(r#"<p class="error">{}</p>"#, escape(error)),
        None => String::new(),
    }
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        include_res!(str, "/style.css"),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound("page")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape(r#"<b class="x">Tom & Jerry</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; Jerry&lt;/b&gt;"
        );
    }

    #[test]
    fn escapes_placeholder_braces() {
        assert_eq!(escape("{body}"), "&#123;body}");
        assert!(!markdown("`{messages}`").contains("{messages}"));
    }

    #[test]
    fn markdown_neutralises_raw_html() {
        let html = markdown("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn markdown_drops_script_links() {
        let html = markdown("[click](javascript:alert(1))");
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn markdown_keeps_formatting() {
        assert_eq!(markdown("**bold**"), "<p><strong>bold</strong></p>\n");
    }
}

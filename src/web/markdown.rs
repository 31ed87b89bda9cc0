//! Markdown rendering for post bodies.
//!
//! Raw HTML in a message is shown as text, not interpreted, and the
//! generated HTML is sanitized so links can't carry script URLs.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render a post message as safe HTML.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, events);
    ammonia::clean(&rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis() {
        let html = render_markdown("**bold** text");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("text"));
    }

    #[test]
    fn test_paragraphs_and_lists() {
        let html = render_markdown("first\n\n- one\n- two");
        assert!(html.contains("<p>first</p>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_raw_html_is_shown_as_text() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_script_links_are_dropped() {
        let html = render_markdown("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));
    }

    #[test]
    fn test_plain_links_kept() {
        let html = render_markdown("[docs](https://example.com/)");
        assert!(html.contains("href=\"https://example.com/\""));
    }
}

//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref SANITIZER: ammonia::Builder<'static> = {
        let mut builder = ammonia::Builder::default();
        // Highlighted code blocks carry classes and inline colours
        builder
            .add_generic_attributes(["class", "id"])
            .add_tag_attributes("span", ["style"])
            .add_tag_attributes("pre", ["style"]);
        builder
    };
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
///
/// Anything between `<` and the next `>` is removed; an unclosed `<` is kept.
pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Plain-text preview of a markup body
///
/// Takes the first `budget` characters of the stripped text and always
/// appends `...`, even when nothing was cut.
///
/// # Examples
/// ```ignore
/// excerpt("<p>Hello</p>", 3) // -> "Hel..."
/// excerpt("<p>Hi</p>", 10)   // -> "Hi..."
/// ```
pub fn excerpt(content: &str, budget: usize) -> String {
    let text: String = strip_html(content).chars().take(budget).collect();
    format!("{}...", text)
}

/// Reduce a markup body to a safe allow-list of tags and attributes
///
/// Scripts, embedded objects, forms, event handler attributes and
/// `javascript:` URLs are removed.
pub fn sanitize_html(s: &str) -> String {
    SANITIZER.clean(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn test_excerpt_truncates_to_budget() {
        let body = format!("<p>{}</p>", "x".repeat(500));
        let preview = excerpt(&body, 200);
        assert_eq!(preview.chars().count(), 203);
        assert_eq!(&preview[..200], "x".repeat(200));
        assert!(preview.ends_with("..."));

        assert_eq!(excerpt(&body, 150).chars().count(), 153);
    }

    #[test]
    fn test_excerpt_short_content_still_gets_ellipsis() {
        assert_eq!(excerpt("<h2>Short</h2> post", 150), "Short post...");
        assert_eq!(excerpt("", 150), "...");
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("<p>héllo wörld</p>", 5), "héllo...");
    }

    #[test]
    fn test_sanitize_html() {
        let dirty = r#"<p onclick="steal()">Hi</p><script>alert(1)</script><a href="javascript:evil()">x</a><img src="x.png" onerror="boom()">"#;
        let clean = sanitize_html(dirty);
        assert!(clean.contains("<p>Hi</p>"));
        assert!(clean.contains(r#"<img src="x.png">"#));
        assert!(!clean.contains("steal"));
        assert!(!clean.contains("alert"));
        assert!(!clean.contains("evil"));
        assert!(!clean.contains("boom"));
    }

    #[test]
    fn test_sanitize_nested_script_does_not_reform() {
        let clean = sanitize_html("<scr<script></script>ipt>alert(1)</script>");
        assert!(!clean.to_lowercase().contains("<script"));
    }

    #[test]
    fn test_sanitize_entity_encoded_script_url() {
        let clean = sanitize_html(r#"<a href="&#106;avascript:alert(1)">x</a>"#);
        assert!(!clean.to_lowercase().contains("javascript"));
        assert!(clean.contains(">x</a>"));
    }

    #[test]
    fn test_sanitize_form_actions() {
        let dirty = r#"<form action="javascript:alert(1)"><button formaction="javascript:alert(2)">go</button></form>"#;
        let clean = sanitize_html(dirty);
        assert!(!clean.to_lowercase().contains("javascript"));
        assert!(!clean.contains("<form"));
    }

    #[test]
    fn test_sanitize_keeps_regular_markup() {
        let body = r#"<h2 id="intro">Intro</h2><p><a href="/blog">Back</a></p>"#;
        let clean = sanitize_html(body);
        assert!(clean.contains(r#"<h2 id="intro">Intro</h2>"#));
        assert!(clean.contains(r#"href="/blog""#));
        assert!(clean.contains(">Back</a>"));
    }

    #[test]
    fn test_sanitize_keeps_highlighted_code() {
        let body = r#"<figure class="highlight rust"><pre style="background-color:#2b303b;"><span style="color:#b48ead;">fn</span></pre></figure>"#;
        let clean = sanitize_html(body);
        assert!(clean.contains(r#"class="highlight rust""#));
        assert!(clean.contains(r#"<span style="color:#b48ead;">fn</span>"#));
    }
}

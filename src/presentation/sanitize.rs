//! Ammonia sanitizer matched to the markup the default converters emit.

use std::{borrow::Cow, collections::HashSet};

use ammonia::Builder as AmmoniaBuilder;

/// Iframe sources outside these prefixes are stripped.
const EMBED_SOURCE_PREFIXES: &[&str] = &[
    "https://www.youtube.com/embed/",
    "https://player.vimeo.com/video/",
];

pub fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "b",
        "blockquote",
        "br",
        "code",
        "div",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "iframe",
        "img",
        "li",
        "ol",
        "p",
        "pre",
        "s",
        "source",
        "span",
        "sub",
        "sup",
        "u",
        "ul",
        "video",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> =
        HashSet::from(["class", "id", "title", "lang", "dir", "role", "aria-checked"]);
    builder.generic_attributes(generic);
    builder.add_generic_attribute_prefixes(&["data-"]);

    builder.link_rel(None);
    builder.add_tag_attributes("a", &["target", "rel", "download"]);
    builder.add_tag_attributes(
        "img",
        &["width", "height", "alt", "loading", "decoding"],
    );
    builder.add_tag_attributes(
        "iframe",
        &["src", "title", "allow", "allowfullscreen", "loading"],
    );
    builder.add_tag_attributes("video", &["controls", "preload"]);
    builder.add_tag_attributes("source", &["src", "type"]);
    builder.add_tag_attributes("ol", &["start"]);
    builder.add_tag_attributes("span", &["style"]);

    builder.add_url_schemes(["http", "https", "mailto", "tel"].iter().copied());

    builder.attribute_filter(|element, attribute, value| {
        if element == "iframe" && attribute == "src" {
            is_embed_source(value).then_some(Cow::Borrowed(value))
        } else if attribute.eq_ignore_ascii_case("style") {
            sanitize_style_attribute(value).map(Cow::Owned)
        } else {
            Some(Cow::Borrowed(value))
        }
    });

    builder
}

fn is_embed_source(url: &str) -> bool {
    EMBED_SOURCE_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

fn sanitize_style_attribute(value: &str) -> Option<String> {
    let sanitized: Vec<&str> = value
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty() && is_safe_style_declaration(decl))
        .collect();

    (!sanitized.is_empty()).then(|| sanitized.join("; "))
}

fn is_safe_style_declaration(decl: &str) -> bool {
    const FORBIDDEN_SUBSTRINGS: [&str; 7] = [
        "expression(",
        "javascript:",
        "vbscript:",
        "-moz-binding",
        "behavior:",
        "behaviour:",
        "@import",
    ];

    let lower = decl.to_ascii_lowercase();
    !FORBIDDEN_SUBSTRINGS
        .iter()
        .any(|needle| lower.contains(needle))
        && !lower.contains("url(")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        build_sanitizer().clean(html).to_string()
    }

    #[test]
    fn keeps_hosted_embeds_and_strips_other_iframe_sources() {
        let kept = clean(r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ" allowfullscreen></iframe>"#);
        assert!(kept.contains(r#"src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
        assert!(kept.contains("allowfullscreen"));

        let stripped = clean(r#"<iframe src="https://evil.example/embed"></iframe>"#);
        assert!(!stripped.contains("evil.example"));
    }

    #[test]
    fn removes_scripts_and_handlers() {
        let html = clean(r#"<p onclick="x()">hi<script>alert(1)</script></p>"#);
        assert_eq!(html, "<p>hi</p>");
    }

    #[test]
    fn keeps_link_attributes_the_converters_emit() {
        let html = clean(
            r#"<a href="/blog/a" target="_blank" rel="noopener noreferrer" data-link-kind="internal">a</a>"#,
        );
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains(r#"data-link-kind="internal""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn style_attribute_drops_unsafe_declarations() {
        assert_eq!(
            sanitize_style_attribute("color: red; background: url('javascript:alert(1)')"),
            Some("color: red".to_string())
        );
        assert_eq!(sanitize_style_attribute("expression(alert(1))"), None);
        let html = clean(r#"<span style="color: red; behavior: url(x.htc)">t</span>"#);
        assert!(html.contains(r#"style="color: red""#));
    }

    #[test]
    fn keeps_underline_and_strikethrough() {
        assert_eq!(clean("<u>a</u><s>b</s>"), "<u>a</u><s>b</s>");
    }
}

//! Allow-list HTML sanitizer.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::parser::parse_fragment;
use crate::policy::{Policy, is_safe_href};
use crate::serializer::{escape_text, to_html};
use crate::tree::{HtmlElement, HtmlNode, push_node};

/// Matches any tag-like `<...>` sequence.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

/// Sanitize untrusted HTML against `policy`.
///
/// Absent or empty input yields an empty string. Disallowed elements are
/// unwrapped (their content stays, the tag goes); disallowed attributes and
/// unsafe links are dropped; `target="_blank"` links always carry
/// `rel="noopener"`. Input that cannot be parsed is reduced to plain text.
#[must_use]
pub fn sanitize(html: Option<&str>, policy: Policy) -> String {
    let Some(html) = html.filter(|h| !h.is_empty()) else {
        return String::new();
    };

    match sanitize_tree(html, policy) {
        Ok(nodes) => to_html(&nodes),
        Err(e) => {
            tracing::warn!(
                error = %e,
                policy = %policy,
                "HTML sanitization failed, stripping tags"
            );
            strip_tags(html)
        }
    }
}

/// Sanitize untrusted HTML into a node list for embedding in a larger tree.
///
/// Behaves like [`sanitize`] but never leaves the tree representation: input
/// that cannot be parsed becomes a single text node with all tags removed.
#[must_use]
pub fn sanitize_fragment(html: &str, policy: Policy) -> Vec<HtmlNode> {
    if html.is_empty() {
        return Vec::new();
    }

    sanitize_tree(html, policy).unwrap_or_else(|e| {
        tracing::warn!(error = %e, policy = %policy, "HTML sanitization failed, stripping tags");
        let text = TAG_PATTERN.replace_all(html, "");
        if text.is_empty() {
            Vec::new()
        } else {
            vec![HtmlNode::Text(text.into_owned())]
        }
    })
}

/// Parse and sanitize `html`, returning the cleaned node list.
///
/// # Errors
///
/// Returns [`ParseError`] if the fragment cannot be parsed.
pub fn sanitize_tree(html: &str, policy: Policy) -> Result<Vec<HtmlNode>, ParseError> {
    let nodes = parse_fragment(html)?;
    Ok(sanitize_nodes(nodes, policy))
}

/// Sanitize an already parsed node list.
#[must_use]
pub fn sanitize_nodes(nodes: Vec<HtmlNode>, policy: Policy) -> Vec<HtmlNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            HtmlNode::Text(_) => push_node(&mut out, node),
            HtmlNode::Element(mut el) => {
                let children = sanitize_nodes(std::mem::take(&mut el.children), policy);
                if policy.allows_tag(&el.tag) {
                    sanitize_attributes(&mut el, policy);
                    el.children = children;
                    out.push(HtmlNode::Element(el));
                } else {
                    // Unwrap: splice the (already cleaned) content into the parent
                    for child in children {
                        push_node(&mut out, child);
                    }
                }
            }
        }
    }
    out
}

/// Drop attributes outside the tag's allow-list and enforce link rules.
fn sanitize_attributes(el: &mut HtmlElement, policy: Policy) {
    let allowed = policy.allowed_attributes(&el.tag);
    el.attrs.retain(|(name, value)| {
        allowed.contains(&name.as_str()) && (name != "href" || is_safe_href(value))
    });

    if el.attr("target") == Some("_blank") {
        ensure_noopener(el);
    }
}

/// Make sure `rel` contains the `noopener` token.
pub fn ensure_noopener(el: &mut HtmlElement) {
    match el.attr("rel") {
        None => el.set_attr("rel", "noopener"),
        Some(rel) if rel.split_whitespace().any(|t| t == "noopener") => {}
        Some(rel) => {
            let rel = if rel.trim().is_empty() {
                "noopener".to_owned()
            } else {
                format!("{} noopener", rel.trim())
            };
            el.set_attr("rel", rel);
        }
    }
}

/// Remove every `<...>` sequence, leaving plain text.
///
/// Any remaining angle brackets are escaped so the result is inert.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(html, "");
    escape_text(&stripped).replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_and_absent_input() {
        assert_eq!(sanitize(None, Policy::Legal), "");
        assert_eq!(sanitize(Some(""), Policy::Basic), "");
    }

    #[test]
    fn test_allowed_markup_passes_through() {
        let html = r#"<h2 id="a">Titel</h2><p>Text <strong>fett</strong></p>"#;
        assert_eq!(sanitize(Some(html), Policy::Legal), html);
    }

    #[test]
    fn test_script_is_unwrapped_to_inert_text() {
        let out = sanitize(Some("<p>Hallo<script>alert(1)</script></p>"), Policy::Legal);
        assert!(!out.contains("<script"));
        assert_eq!(out, "<p>Halloalert(1)</p>");
    }

    #[test]
    fn test_nested_script_inside_disallowed_tag() {
        let out = sanitize(
            Some("<font><script>steal()</script>Text</font>"),
            Policy::Legal,
        );
        assert!(!out.contains("<script"));
        assert_eq!(out, "steal()Text");
    }

    #[test]
    fn test_uppercase_script_is_removed() {
        let out = sanitize(Some("<SCRIPT>x()</SCRIPT>"), Policy::Basic);
        assert!(!out.to_ascii_lowercase().contains("<script"));
    }

    #[test]
    fn test_disallowed_attributes_removed() {
        let out = sanitize(
            Some(r#"<p onclick="x()" class="lead">a</p><div class="box" style="color:red">b</div>"#),
            Policy::Legal,
        );
        assert_eq!(out, r#"<p>a</p><div class="box">b</div>"#);
    }

    #[test]
    fn test_dangerous_hrefs_removed() {
        for href in [
            "javascript:alert(1)",
            "data:text/html,<b>x</b>",
            "vbscript:msgbox(1)",
            "JAVASCRIPT:alert(1)",
            "ftp://example.com/file",
        ] {
            let escaped = href.replace('<', "&lt;").replace('>', "&gt;");
            let html = format!(r#"<a href="{escaped}">link</a>"#);
            let out = sanitize(Some(&html), Policy::Basic);
            assert_eq!(out, "<a>link</a>", "href {href} should be removed");
        }
    }

    #[test]
    fn test_safe_hrefs_kept() {
        let html = r#"<a href="mailto:info@maklerzentrum.ch">Mail</a><a href="/kontakt">Kontakt</a>"#;
        assert_eq!(sanitize(Some(html), Policy::Basic), html);
    }

    #[test]
    fn test_target_blank_gets_noopener() {
        let out = sanitize(
            Some(r#"<a href="https://reteach.ch" target="_blank">Login</a>"#),
            Policy::Basic,
        );
        assert_eq!(
            out,
            r#"<a href="https://reteach.ch" target="_blank" rel="noopener">Login</a>"#
        );
    }

    #[test]
    fn test_target_blank_appends_to_existing_rel() {
        let out = sanitize(
            Some(r#"<a target="_blank" rel="noreferrer">x</a>"#),
            Policy::Legal,
        );
        assert_eq!(out, r#"<a target="_blank" rel="noreferrer noopener">x</a>"#);
    }

    #[test]
    fn test_target_blank_keeps_existing_noopener() {
        let html = r#"<a target="_blank" rel="noopener noreferrer">x</a>"#;
        assert_eq!(sanitize(Some(html), Policy::Legal), html);
    }

    #[test]
    fn test_basic_policy_unwraps_block_tags() {
        let out = sanitize(
            Some("<h1>Titel</h1><p>Absatz <em>kursiv</em></p><ul><li>eins</li></ul>"),
            Policy::Basic,
        );
        assert_eq!(out, "Titel<p>Absatz <em>kursiv</em></p>eins");
    }

    #[test]
    fn test_void_elements_survive() {
        let out = sanitize(Some("<p>Zeile<br>Zeile</p><hr>"), Policy::Legal);
        assert_eq!(out, "<p>Zeile<br>Zeile</p><hr>");
    }

    #[test]
    fn test_img_is_dropped() {
        let out = sanitize(Some(r#"<p><img src="x" onerror="alert(1)">Bild</p>"#), Policy::Legal);
        assert_eq!(out, "<p>Bild</p>");
    }

    #[test]
    fn test_malformed_input_falls_back_to_text() {
        let out = sanitize(Some(r#"<p class="offen>fett"#), Policy::Legal);
        assert_eq!(out, "fett");
    }

    #[test]
    fn test_omitted_end_tags_keep_structure() {
        let out = sanitize(Some("<ul><li>Eins<li>Zwei</ul>"), Policy::Legal);
        assert_eq!(out, "<ul><li>Eins</li><li>Zwei</li></ul>");

        let out = sanitize(Some("<p>Absatz eins<p>Absatz zwei"), Policy::Legal);
        assert_eq!(out, "<p>Absatz eins</p><p>Absatz zwei</p>");

        let out = sanitize(Some("<p>offen <b>fett</p>"), Policy::Legal);
        assert_eq!(out, "<p>offen <b>fett</b></p>");
    }

    #[test]
    fn test_quoted_angle_bracket_does_not_leak_into_text() {
        let out = sanitize(Some(r#"<p>Text</p><img alt="a>b" src="x">"#), Policy::Legal);
        assert_eq!(out, "<p>Text</p>");
    }

    #[test]
    fn test_script_body_becomes_escaped_text() {
        let out = sanitize(Some("<div><script>if (a < b) x()</script>"), Policy::Legal);
        assert!(!out.contains("<script"));
        assert_eq!(out, "<div>if (a &lt; b) x()</div>");
    }

    #[test]
    fn test_sanitize_does_not_mutate_input() {
        let input = String::from("<script>x</script>");
        let _ = sanitize(Some(&input), Policy::Legal);
        assert_eq!(input, "<script>x</script>");
    }

    #[test]
    fn test_strip_tags_escapes_leftover_brackets() {
        assert_eq!(strip_tags("<b>a</b> < <script"), "a &lt; &lt;script");
        assert_eq!(strip_tags("A & B"), "A & B");
    }

    #[test]
    fn test_sanitize_fragment_returns_nodes() {
        let nodes = sanitize_fragment("<p>Hallo <script>x</script></p>", Policy::Basic);
        assert_eq!(
            nodes,
            vec![HtmlNode::Element(HtmlElement::new("p").with_text("Hallo x"))]
        );
    }

    #[test]
    fn test_sanitize_fragment_unparsable_becomes_text() {
        let nodes = sanitize_fragment(r#"<p title="offen>fett"#, Policy::Basic);
        assert_eq!(nodes, vec![HtmlNode::text("fett")]);
        assert!(sanitize_fragment("", Policy::Basic).is_empty());
    }

    #[test]
    fn test_text_is_escaped_on_output() {
        let out = sanitize(Some("<p>1 &lt; 2 &amp; 3</p>"), Policy::Basic);
        assert_eq!(out, "<p>1 &lt; 2 &amp; 3</p>");
    }
}

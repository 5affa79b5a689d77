//! Accessibility pass over CMS-provided HTML.

use mz_html::{HtmlElement, HtmlNode, Policy, ensure_noopener, sanitize_fragment};

use crate::page::for_each_element_mut;

/// Headings beyond this count get a skip navigation.
const SKIP_NAV_THRESHOLD: usize = 3;

/// Leaf text longer than this (in characters) is marked `role="text"`.
const LONG_TEXT_CHARS: usize = 50;

/// Sanitize `html` with `policy` and run [`improve_accessibility`] on it.
#[must_use]
pub fn accessible_html(html: &str, policy: Policy) -> Vec<HtmlNode> {
    let mut nodes = sanitize_fragment(html, policy);
    improve_accessibility(&mut nodes);
    nodes
}

/// Apply the accessibility improvements to a node list in place.
///
/// - more than three `h2`/`h3` headings: a skip navigation listing them is
///   inserted at the start; headings without an id get `heading-{n}`
/// - external `http(s)` links open in a new tab and carry `rel="noopener"`
/// - `div`/`span` leaves with more than 50 characters of text and no
///   `aria-label` or `role` get `role="text"`
pub fn improve_accessibility(nodes: &mut Vec<HtmlNode>) {
    if let Some(nav) = skip_navigation(nodes) {
        nodes.insert(0, nav.into());
    }

    for_each_element_mut(nodes, &mut |el| {
        if el.tag == "a" && el.attr("href").is_some_and(|h| h.starts_with("http")) {
            if !el.has_attr("target") {
                el.set_attr("target", "_blank");
            }
            ensure_noopener(el);
        }

        if matches!(el.tag.as_str(), "div" | "span") && is_long_unlabelled_leaf(el) {
            el.set_attr("role", "text");
        }
    });
}

/// Build the skip navigation, assigning missing heading ids on the way.
fn skip_navigation(nodes: &mut [HtmlNode]) -> Option<HtmlElement> {
    let mut headings: Vec<(String, String)> = Vec::new();
    let mut count = 0;
    for_each_element_mut(nodes, &mut |el| {
        if matches!(el.tag.as_str(), "h2" | "h3") {
            headings.push((el.attr("id").unwrap_or_default().to_owned(), el.text_content()));
            count += 1;
        }
    });

    if count <= SKIP_NAV_THRESHOLD {
        return None;
    }

    let mut index = 0;
    for_each_element_mut(nodes, &mut |el| {
        if matches!(el.tag.as_str(), "h2" | "h3") {
            if headings[index].0.is_empty() {
                let id = format!("heading-{index}");
                el.set_attr("id", id.clone());
                headings[index].0 = id;
            }
            index += 1;
        }
    });

    let items = headings.into_iter().map(|(id, text)| {
        HtmlElement::new("li")
            .with_child(
                HtmlElement::new("a")
                    .with_attr("href", format!("#{id}"))
                    .with_text(text.trim()),
            )
            .into()
    });

    Some(
        HtmlElement::new("nav")
            .with_class("skip-nav")
            .with_attr("aria-label", "Inhaltsverzeichnis")
            .with_child(HtmlElement::new("ol").with_children(items)),
    )
}

fn is_long_unlabelled_leaf(el: &HtmlElement) -> bool {
    if el.has_attr("aria-label") || el.has_attr("role") || el.has_element_children() {
        return false;
    }
    let text = el.text_content();
    let text = text.trim();
    !text.is_empty() && text.chars().count() > LONG_TEXT_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_html::to_html;
    use pretty_assertions::assert_eq;

    fn improved(html: &str) -> String {
        to_html(&accessible_html(html, Policy::Legal))
    }

    #[test]
    fn test_few_headings_no_skip_nav() {
        let html = "<h2>A</h2><h2>B</h2><h3>C</h3>";
        assert_eq!(improved(html), html);
    }

    #[test]
    fn test_skip_nav_for_many_headings() {
        let out = improved(r#"<h2>Eins</h2><h2 id="zwei">Zwei</h2><h3>Drei</h3><h2>Vier</h2>"#);
        assert_eq!(
            out,
            concat!(
                r#"<nav class="skip-nav" aria-label="Inhaltsverzeichnis"><ol>"#,
                r##"<li><a href="#heading-0">Eins</a></li>"##,
                r##"<li><a href="#zwei">Zwei</a></li>"##,
                r##"<li><a href="#heading-2">Drei</a></li>"##,
                r##"<li><a href="#heading-3">Vier</a></li>"##,
                "</ol></nav>",
                r#"<h2 id="heading-0">Eins</h2><h2 id="zwei">Zwei</h2>"#,
                r#"<h3 id="heading-2">Drei</h3><h2 id="heading-3">Vier</h2>"#,
            )
        );
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        assert_eq!(
            improved(r#"<a href="https://reteach.ch">Login</a><a href="/kontakt">Kontakt</a>"#),
            r#"<a href="https://reteach.ch" target="_blank" rel="noopener">Login</a><a href="/kontakt">Kontakt</a>"#
        );
    }

    #[test]
    fn test_external_link_keeps_explicit_target() {
        assert_eq!(
            improved(r#"<a href="http://x.ch" target="_self" rel="nofollow">x</a>"#),
            r#"<a href="http://x.ch" target="_self" rel="nofollow noopener">x</a>"#
        );
    }

    #[test]
    fn test_long_leaf_text_gets_role() {
        let long = "Dieser Absatz ist deutlich laenger als fuenfzig Zeichen.";
        let out = improved(&format!(
            r#"<div>{long}</div><span>kurz</span><div class="x"><p>{long}</p></div>"#
        ));
        assert_eq!(
            out,
            format!(
                r#"<div role="text">{long}</div><span>kurz</span><div class="x"><p>{long}</p></div>"#
            )
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 30 umlauts: 60 bytes but only 30 characters
        let text = "\u{00e4}".repeat(30);
        let out = improved(&format!("<div>{text}</div>"));
        assert_eq!(out, format!("<div>{text}</div>"));
    }
}

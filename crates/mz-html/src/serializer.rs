//! HTML serialization for node trees.

use crate::tree::{HtmlElement, HtmlNode};

/// Serialize a node list to an HTML string.
///
/// Text and attribute values are escaped, except the content of `<script>` and
/// `<style>`, which is written as is. Void elements are written without a
/// closing tag.
#[must_use]
pub fn to_html(nodes: &[HtmlNode]) -> String {
    let mut out = String::with_capacity(256);
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

/// Serialize a single element (including its own tag).
#[must_use]
pub fn element_to_html(el: &HtmlElement) -> String {
    let mut out = String::with_capacity(256);
    write_element(el, &mut out);
    out
}

fn write_node(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text(text) => out.push_str(&escape_text(text)),
        HtmlNode::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &HtmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);

    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    out.push('>');
    if el.is_void() {
        return;
    }

    for child in &el.children {
        match child {
            HtmlNode::Text(text) if el.is_raw_text() => out.push_str(text),
            _ => write_node(child, out),
        }
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Escape text for HTML content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    escape_html(text, false)
}

/// Escape text for HTML attribute values.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    escape_html(text, true)
}

fn escape_html(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

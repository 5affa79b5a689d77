//! HTML fragment parser built on the `quick-xml` reader.
//!
//! CMS copy is close to XHTML but not quite. Before the XML reader sees it,
//! `<script>`/`<style>` bodies are lifted out as raw text and named entities,
//! unclosed void elements and bare ampersands are normalized; the result is
//! wrapped in a synthetic root. End tags are matched the HTML way: omitted
//! ones are implied (`<li>` after an open `<li>`, an end tag closing whatever
//! is still open inside it) and stray ones are ignored. Only markup the reader
//! cannot tokenize at all (an unterminated tag or attribute value) is an error,
//! so callers can degrade to plain text.

use std::collections::VecDeque;
use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::entities::{convert_html_entities, decode_entity, escape_bare_ampersands};
use crate::error::ParseError;
use crate::tree::{Document, HtmlElement, HtmlNode, RAW_TEXT_ELEMENTS, push_text};

/// Synthetic wrapper element name.
const ROOT_TAG: &str = "mz-fragment-root";

/// Void elements written HTML-style (`<br>`) that need XML self-closing form.
/// Quoted attribute values may contain `>`.
static VOID_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<(area|base|br|col|embed|hr|img|input|link|meta|source|track|wbr)((?:\s(?:[^<>"']|"[^"]*"|'[^']*')*?)?)\s*/?>"#,
    )
    .expect("invalid void tag regex")
});

/// Start tags that end an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Elements an implied `</p>` does not reach past.
const PARAGRAPH_SCOPE: &[&str] = &["button", "caption", "li", "table", "td", "template", "th"];

/// Parse an HTML fragment into a list of top-level nodes.
///
/// Tag and attribute names are lowercased. Comments, processing instructions
/// and doctype declarations are dropped.
///
/// # Errors
///
/// Returns [`ParseError`] if the fragment cannot be tokenized after
/// normalization.
pub fn parse_fragment(html: &str) -> Result<Vec<HtmlNode>, ParseError> {
    parse_document(html).map(|doc| doc.nodes)
}

/// Parse a full HTML document, keeping its doctype.
///
/// # Errors
///
/// Returns [`ParseError`] if the markup cannot be tokenized after
/// normalization.
pub fn parse_document(html: &str) -> Result<Document, ParseError> {
    let (html, mut raw_texts) = extract_raw_text(html);
    let normalized = normalize(&html);
    let wrapped = format!("<{ROOT_TAG}>{normalized}</{ROOT_TAG}>");

    let mut reader = Reader::from_str(&wrapped);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut stack: Vec<HtmlElement> = Vec::new();
    let mut doctype = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut el = decode_element(&reader, &e);
                close_implied(&mut stack, &el.tag);
                if el.is_raw_text()
                    && let Some(text) = raw_texts.pop_front()
                {
                    push_text(&mut el.children, &text);
                }
                stack.push(el);
            }
            Event::Empty(e) => {
                let el = decode_element(&reader, &e);
                close_implied(&mut stack, &el.tag);
                current(&mut stack)?.children.push(HtmlNode::Element(el));
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                push_text(&mut current(&mut stack)?.children, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                let text = decode_entity(&entity);
                push_text(&mut current(&mut stack)?.children, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                push_text(&mut current(&mut stack)?.children, &text);
            }
            Event::End(e) => {
                let name = decode_name(&reader, e.name().as_ref());
                if name == ROOT_TAG {
                    close_from(&mut stack, 1);
                    let root = stack.pop().ok_or(ParseError::UnexpectedEnd)?;
                    return Ok(Document {
                        doctype,
                        nodes: root.children,
                    });
                }
                match stack.iter().rposition(|el| el.tag == name) {
                    Some(depth) => close_from(&mut stack, depth),
                    None => tracing::debug!(tag = %name, "Ignoring stray end tag"),
                }
            }
            Event::DocType(e) => {
                if doctype.is_none() {
                    doctype = Some(reader.decoder().decode(&e)?.trim().to_owned());
                }
            }
            Event::Eof => return Err(ParseError::Unclosed),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) => {}
        }
    }
}

/// Normalize HTML-isms the XML reader rejects.
fn normalize(html: &str) -> String {
    let html = convert_html_entities(html);
    let html = escape_bare_ampersands(&html);
    VOID_TAG_PATTERN
        .replace_all(&html, "<$1$2 />")
        .into_owned()
}

/// Lift the bodies of raw text elements out of `html`.
///
/// Returns the markup with every `<script>`/`<style>` body removed and the
/// bodies in document order. A body without an end tag runs to the end of
/// the input.
fn extract_raw_text(html: &str) -> (String, VecDeque<String>) {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut raw = VecDeque::new();
    let mut pos = 0;

    while let Some((start, tag)) = find_raw_text_start(&lower, pos) {
        let Some((len, self_closing)) = start_tag_len(&html[start..]) else {
            break;
        };
        let content_start = start + len;
        out.push_str(&html[pos..content_start]);
        pos = content_start;
        if self_closing {
            continue;
        }

        let close = lower[content_start..]
            .find(&format!("</{tag}"))
            .map_or(html.len(), |offset| content_start + offset);
        raw.push_back(html[content_start..close].to_owned());
        pos = close;
    }

    out.push_str(&html[pos..]);
    (out, raw)
}

/// Position and name of the next raw text start tag at or after `from`.
fn find_raw_text_start(lower: &str, from: usize) -> Option<(usize, &'static str)> {
    let mut at = from;
    while let Some(offset) = lower[at..].find('<') {
        at += offset;
        let after = &lower[at + 1..];
        for &tag in RAW_TEXT_ELEMENTS {
            if let Some(rest) = after.strip_prefix(tag)
                && rest.starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace())
            {
                return Some((at, tag));
            }
        }
        at += 1;
    }
    None
}

/// Byte length of the start tag at the beginning of `tag`, and whether it is
/// self-closing. `None` if the tag never ends.
fn start_tag_len(tag: &str) -> Option<(usize, bool)> {
    let mut quote = None;
    for (i, c) in tag.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some((i + 1, tag[..i].ends_with('/'))),
            _ => {}
        }
    }
    None
}

/// Close elements a start tag for `tag` implicitly ends, such as an open
/// `<li>` when the next `<li>` starts.
fn close_implied(stack: &mut Vec<HtmlElement>, tag: &str) {
    let Some((closes, scope)) = implied_end(tag) else {
        return;
    };
    for depth in (1..stack.len()).rev() {
        let open = stack[depth].tag.as_str();
        if closes.contains(&open) {
            close_from(stack, depth);
            return;
        }
        if scope.contains(&open) {
            return;
        }
    }
}

/// Elements a start tag ends, and the elements the search stops at.
fn implied_end(tag: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    let rule: (&'static [&'static str], &'static [&'static str]) = match tag {
        "li" => (&["li"], &["ol", "ul"]),
        "dt" | "dd" => (&["dd", "dt"], &["dl"]),
        "tr" => (&["tr"], &["table", "tbody", "tfoot", "thead"]),
        "td" | "th" => (&["td", "th"], &["table", "tr"]),
        "option" => (&["option"], &["datalist", "optgroup", "select"]),
        _ if CLOSES_PARAGRAPH.contains(&tag) => (&["p"], PARAGRAPH_SCOPE),
        _ => return None,
    };
    Some(rule)
}

/// Close every open element at `depth` and above, attaching each to its
/// parent. The synthetic root at depth 0 stays open.
fn close_from(stack: &mut Vec<HtmlElement>, depth: usize) {
    while stack.len() > depth.max(1) {
        if let Some(el) = stack.pop()
            && let Some(parent) = stack.last_mut()
        {
            parent.children.push(HtmlNode::Element(el));
        }
    }
}

fn current(stack: &mut [HtmlElement]) -> Result<&mut HtmlElement, ParseError> {
    stack.last_mut().ok_or(ParseError::UnexpectedEnd)
}

fn decode_element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> HtmlElement {
    let tag = decode_name(reader, e.name().as_ref());
    let mut attrs: Vec<(String, String)> = Vec::new();

    for attr in e.html_attributes().flatten() {
        let key = decode_name(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        if !attrs.iter().any(|(existing, _)| *existing == key) {
            attrs.push((key, value));
        }
    }

    HtmlElement {
        tag,
        attrs,
        children: Vec::new(),
    }
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader
        .decoder()
        .decode(name)
        .map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
        .to_ascii_lowercase()
}

//! Addressable page model.

use std::fmt;

use mz_html::{HtmlElement, HtmlNode, ParseError, parse_document, parse_fragment, to_html};

/// Element selector.
///
/// Supports the forms content slots are addressed by: an element id, an
/// attribute (optionally with a value) and, for document-level elements like
/// `<title>`, a tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `tag`
    Tag(String),
    /// `[name]` or `[name="value"]`
    Attr {
        /// Attribute name.
        name: String,
        /// Required value; `None` matches any value.
        value: Option<String>,
    },
}

impl Selector {
    /// Match by element id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Match by tag name.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Match elements whose attribute `name` equals `value`.
    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Match elements carrying attribute `name`.
    pub fn has_attr(name: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: None,
        }
    }

    /// Whether `el` matches.
    #[must_use]
    pub fn matches(&self, el: &HtmlElement) -> bool {
        match self {
            Self::Id(id) => el.attr("id") == Some(id.as_str()),
            Self::Tag(tag) => el.tag == *tag,
            Self::Attr { name, value: None } => el.has_attr(name),
            Self::Attr {
                name,
                value: Some(value),
            } => el.attr(name) == Some(value.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Tag(tag) => f.write_str(tag),
            Self::Attr { name, value: None } => write!(f, "[{name}]"),
            Self::Attr {
                name,
                value: Some(value),
            } => write!(f, "[{name}=\"{value}\"]"),
        }
    }
}

/// Reusable markup cloned once per list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<HtmlNode>,
}

impl Template {
    /// Template with the given content.
    #[must_use]
    pub fn new(nodes: Vec<HtmlNode>) -> Self {
        Self { nodes }
    }

    /// Parse template content from HTML.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the markup is malformed.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        parse_fragment(html).map(Self::new)
    }

    /// A fresh copy of the template content.
    #[must_use]
    pub fn instantiate(&self) -> Vec<HtmlNode> {
        self.nodes.clone()
    }
}

/// Page shell with content slots.
///
/// The shell is trusted markup (it ships with the site); only what is filled
/// into its slots comes from the CMS. Filling a slot replaces its content
/// entirely, for every element the selector matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    doctype: Option<String>,
    nodes: Vec<HtmlNode>,
}

impl Page {
    /// Page made of `nodes`.
    #[must_use]
    pub fn new(nodes: Vec<HtmlNode>) -> Self {
        Self {
            doctype: None,
            nodes,
        }
    }

    /// Parse a page shell.
    ///
    /// The doctype is kept and `<script>`/`<style>` bodies are carried through
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the markup is malformed.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        let doc = parse_document(html)?;
        Ok(Self {
            doctype: doc.doctype,
            nodes: doc.nodes,
        })
    }

    /// Top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> &[HtmlNode] {
        &self.nodes
    }

    /// All elements matching `selector`, in document order.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<&HtmlElement> {
        let mut found = Vec::new();
        collect_matches(&self.nodes, selector, &mut found);
        found
    }

    /// First element matching `selector`.
    #[must_use]
    pub fn find(&self, selector: &Selector) -> Option<&HtmlElement> {
        self.select(selector).into_iter().next()
    }

    /// Apply `f` to every element matching `selector`.
    ///
    /// `f` receives the match index. Returns the number of matches.
    pub fn update(
        &mut self,
        selector: &Selector,
        mut f: impl FnMut(usize, &mut HtmlElement),
    ) -> usize {
        let mut count = 0;
        update_matches(&mut self.nodes, selector, &mut |el| {
            f(count, el);
            count += 1;
        });
        count
    }

    /// Replace the content of every element matching `selector`.
    ///
    /// A selector that matches nothing is logged and otherwise ignored.
    /// Returns the number of filled elements.
    pub fn fill(&mut self, selector: &Selector, children: &[HtmlNode]) -> usize {
        let count = self.update(selector, |_, el| el.replace_children(children.to_vec()));
        if count == 0 {
            tracing::warn!(%selector, "Render target not found");
        }
        count
    }

    /// Content of the `<template>` element with the given id.
    #[must_use]
    pub fn template(&self, id: &str) -> Option<Template> {
        self.select(&Selector::id(id))
            .into_iter()
            .find(|el| el.tag == "template")
            .map(|el| Template::new(el.children.clone()))
    }

    /// Serialize the page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let body = to_html(&self.nodes);
        match &self.doctype {
            Some(doctype) => format!("<!DOCTYPE {doctype}>{body}"),
            None => body,
        }
    }
}

fn collect_matches<'a>(
    nodes: &'a [HtmlNode],
    selector: &Selector,
    found: &mut Vec<&'a HtmlElement>,
) {
    for node in nodes {
        if let HtmlNode::Element(el) = node {
            if selector.matches(el) {
                found.push(el);
            }
            collect_matches(&el.children, selector, found);
        }
    }
}

/// Visit matches depth-first. Children of a match are not searched, so a
/// fill never revisits content it just inserted.
fn update_matches(
    nodes: &mut [HtmlNode],
    selector: &Selector,
    f: &mut impl FnMut(&mut HtmlElement),
) {
    for node in nodes {
        if let HtmlNode::Element(el) = node {
            if selector.matches(el) {
                f(el);
            } else {
                update_matches(&mut el.children, selector, f);
            }
        }
    }
}

/// Apply `f` to every element in `nodes`, parents before children.
pub(crate) fn for_each_element_mut(nodes: &mut [HtmlNode], f: &mut impl FnMut(&mut HtmlElement)) {
    for node in nodes {
        if let HtmlNode::Element(el) = node {
            f(el);
            el.visit_elements_mut(f);
        }
    }
}

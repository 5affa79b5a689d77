//! Node tree for HTML fragments.

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text: never entity-decoded or escaped.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parsed HTML document: an optional doctype and the top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Doctype name as written (`html`), without `<!DOCTYPE` and `>`.
    pub doctype: Option<String>,
    /// Top-level nodes.
    pub nodes: Vec<HtmlNode>,
}

/// Node in a parsed or constructed HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Element with attributes and children.
    Element(HtmlElement),
    /// Unescaped text content.
    Text(String),
}

impl HtmlNode {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Concatenated text of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Borrow the element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }
}

impl From<HtmlElement> for HtmlNode {
    fn from(el: HtmlElement) -> Self {
        Self::Element(el)
    }
}

/// HTML element.
///
/// Attributes keep their source order so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add the `class` attribute.
    #[must_use]
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<HtmlNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several child nodes.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = HtmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(HtmlNode::Text(text.into()))
    }

    /// Whether this is a void element (`<br>`, `<img>`, ...).
    #[must_use]
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Whether this is a raw text element (`<script>`, `<style>`).
    #[must_use]
    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    /// Replace all children with `children`.
    pub fn replace_children(&mut self, children: Vec<HtmlNode>) {
        self.children = children;
    }

    /// Whether any child is an element.
    #[must_use]
    pub fn has_element_children(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, HtmlNode::Element(_)))
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Visit every descendant element depth-first, parents before children.
    pub fn visit_elements_mut(&mut self, f: &mut impl FnMut(&mut HtmlElement)) {
        for child in &mut self.children {
            if let HtmlNode::Element(el) = child {
                f(el);
                el.visit_elements_mut(f);
            }
        }
    }

    /// Visit every descendant element depth-first, parents before children.
    pub fn visit_elements(&self, f: &mut impl FnMut(&HtmlElement)) {
        for child in &self.children {
            if let HtmlNode::Element(el) = child {
                f(el);
                el.visit_elements(f);
            }
        }
    }
}

/// Append text to a node list, merging with a trailing text node.
pub(crate) fn push_text(nodes: &mut Vec<HtmlNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(HtmlNode::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(HtmlNode::Text(text.to_owned()));
    }
}

/// Append a node to a node list, merging adjacent text.
pub(crate) fn push_node(nodes: &mut Vec<HtmlNode>, node: HtmlNode) {
    match node {
        HtmlNode::Text(text) => push_text(nodes, &text),
        element @ HtmlNode::Element(_) => nodes.push(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = HtmlElement::new("a")
            .with_attr("href", "/a")
            .with_attr("rel", "x");
        el.set_attr("href", "/b");
        assert_eq!(
            el.attrs,
            vec![
                ("href".to_owned(), "/b".to_owned()),
                ("rel".to_owned(), "x".to_owned())
            ]
        );
    }

    #[test]
    fn test_remove_attr() {
        let mut el = HtmlElement::new("a").with_attr("href", "/a");
        el.remove_attr("href");
        assert!(!el.has_attr("href"));
    }

    #[test]
    fn test_text_content_nested() {
        let el = HtmlElement::new("p")
            .with_text("Hello ")
            .with_child(HtmlElement::new("strong").with_text("World"));
        assert_eq!(el.text_content(), "Hello World");
        assert!(el.has_element_children());
    }

    #[test]
    fn test_push_text_merges_adjacent() {
        let mut nodes = vec![HtmlNode::text("a")];
        push_text(&mut nodes, "b");
        push_text(&mut nodes, "");
        assert_eq!(nodes, vec![HtmlNode::text("ab")]);
    }

    #[test]
    fn test_visit_elements_mut_reaches_descendants() {
        let mut root = HtmlElement::new("div").with_child(
            HtmlElement::new("section").with_child(HtmlElement::new("h2").with_text("T")),
        );
        let mut tags = Vec::new();
        root.visit_elements_mut(&mut |el| tags.push(el.tag.clone()));
        assert_eq!(tags, vec!["section", "h2"]);
    }

    #[test]
    fn test_void_elements() {
        assert!(HtmlElement::new("br").is_void());
        assert!(!HtmlElement::new("p").is_void());
    }
}

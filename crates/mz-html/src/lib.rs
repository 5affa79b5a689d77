//! HTML fragments for CMS-managed copy.
//!
//! Content delivered by the CMS is untrusted markup. This crate parses it into
//! a small node tree ([`HtmlNode`] / [`HtmlElement`]), filters the tree against
//! an allow-list [`Policy`] and serializes it back to HTML.
//!
//! Two policies exist:
//!
//! - [`Policy::Legal`]: document formatting for imprint, privacy and terms pages
//! - [`Policy::Basic`]: inline formatting for FAQ answers, bios and similar
//!   short rich-text fields
//!
//! # Example
//!
//! ```
//! use mz_html::{Policy, sanitize};
//!
//! let html = sanitize(Some("<p onclick=\"x()\">Hallo<script>x()</script></p>"), Policy::Basic);
//! assert_eq!(html, "<p>Hallox()</p>");
//! ```

mod entities;
mod error;
mod parser;
mod policy;
mod sanitize;
mod serializer;
mod tree;

pub use error::ParseError;
pub use parser::{parse_document, parse_fragment};
pub use policy::{ALLOWED_PROTOCOLS, Policy, UnknownPolicy, is_safe_href};
pub use sanitize::{
    ensure_noopener, sanitize, sanitize_fragment, sanitize_nodes, sanitize_tree, strip_tags,
};
pub use serializer::{element_to_html, escape_attr, escape_text, to_html};
pub use tree::{Document, HtmlElement, HtmlNode, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

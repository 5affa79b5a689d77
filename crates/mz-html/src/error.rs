//! Error types for HTML parsing.

/// Error while parsing an HTML fragment.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// XML reader error (mismatched tags, stray markup).
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    /// Encoding error while decoding names or text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Input ended while elements were still open.
    #[error("unclosed element at end of input")]
    Unclosed,

    /// A closing tag had no matching opening tag.
    #[error("unexpected closing tag")]
    UnexpectedEnd,
}

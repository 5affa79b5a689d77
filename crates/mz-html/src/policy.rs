//! Sanitizer allow-lists.

use std::fmt;
use std::str::FromStr;

/// Tags allowed in legal documents (imprint, privacy policy, terms).
const LEGAL_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "ul", "ol", "li", "strong", "b", "em",
    "i", "u", "a", "span", "div", "address", "blockquote", "table", "thead", "tbody", "tr", "th",
    "td", "nav", "section", "article", "small", "sup", "sub",
];

/// Tags allowed in short rich-text fields (FAQ answers, bios).
const BASIC_TAGS: &[&str] = &["p", "br", "strong", "em", "a"];

/// Attributes allowed per tag. Tags not listed keep no attributes.
const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target", "rel"]),
    ("div", &["class", "id"]),
    ("span", &["class"]),
    ("h1", &["id"]),
    ("h2", &["id"]),
    ("h3", &["id"]),
    ("h4", &["id"]),
    ("h5", &["id"]),
    ("h6", &["id"]),
    ("section", &["class", "id"]),
    ("nav", &["aria-label", "class"]),
    ("ol", &["class"]),
    ("ul", &["class"]),
    ("li", &["class"]),
    ("table", &["class"]),
    ("thead", &["class"]),
    ("tbody", &["class"]),
    ("tr", &["class"]),
    ("th", &["class"]),
    ("td", &["class"]),
];

/// Link schemes that may appear in `href`.
pub const ALLOWED_PROTOCOLS: &[&str] = &["http:", "https:", "mailto:", "tel:"];

/// Schemes rejected outright regardless of the protocol allow-list.
const BLOCKED_PROTOCOLS: &[&str] = &["javascript:", "data:", "vbscript:"];

/// Named sanitizer policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// Full document formatting for legal pages.
    #[default]
    Legal,
    /// Inline formatting only.
    Basic,
}

impl Policy {
    /// Policy name as used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Basic => "basic",
        }
    }

    /// Tags this policy keeps.
    #[must_use]
    pub fn allowed_tags(self) -> &'static [&'static str] {
        match self {
            Self::Legal => LEGAL_TAGS,
            Self::Basic => BASIC_TAGS,
        }
    }

    /// Whether `tag` (lowercase) is kept.
    #[must_use]
    pub fn allows_tag(self, tag: &str) -> bool {
        self.allowed_tags().contains(&tag)
    }

    /// Attributes `tag` may carry.
    #[must_use]
    pub fn allowed_attributes(self, tag: &str) -> &'static [&'static str] {
        ALLOWED_ATTRIBUTES
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(&[] as &[&str], |&(_, attrs)| attrs)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unknown policy names.
#[derive(Debug, thiserror::Error)]
#[error("unknown sanitizer policy: {0} (expected \"legal\" or \"basic\")")]
pub struct UnknownPolicy(String);

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legal" => Ok(Self::Legal),
            "basic" => Ok(Self::Basic),
            other => Err(UnknownPolicy(other.to_owned())),
        }
    }
}

/// Whether an `href` value may be kept.
///
/// Relative references pass. Absolute ones must use an allowed scheme.
#[must_use]
pub fn is_safe_href(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();

    if BLOCKED_PROTOCOLS.iter().any(|p| lower.starts_with(p)) {
        return false;
    }

    let Some(colon) = lower.find(':') else {
        return true;
    };
    let scheme = &lower[..colon];
    // A colon after a path, query or fragment delimiter is not a scheme separator
    if scheme.contains(['/', '?', '#']) {
        return true;
    }

    ALLOWED_PROTOCOLS.contains(&&lower[..=colon])
}

//! HTML entity handling for the XML-based fragment parser.
//!
//! Named HTML entities are converted to Unicode before parsing because the XML
//! reader only knows the five predefined entities. Bare ampersands that do not
//! start a reference are escaped so CMS copy like `Fragen & Antworten` parses.

use std::sync::LazyLock;

use regex::Regex;

/// Regex pattern for matching named HTML entities.
static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Convert named HTML entities to Unicode characters.
///
/// Standard XML entities (amp, lt, gt, quot, apos) and unknown names are left
/// unchanged.
pub(crate) fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures<'_>| {
            entity_to_unicode(&caps[1]).map_or_else(|| caps[0].to_owned(), str::to_owned)
        })
        .into_owned()
}

/// Escape `&` characters that do not begin an entity or character reference.
pub(crate) fn escape_bare_ampersands(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if starts_reference(tail) {
            out.push('&');
        } else {
            out.push_str("&amp;");
        }
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

/// Whether `s` (starting at `&`) is `&name;`, `&#123;` or `&#x1F;`.
fn starts_reference(s: &str) -> bool {
    let Some(end) = s.find(';') else {
        return false;
    };
    let body = &s[1..end];
    if let Some(num) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(num) = body.strip_prefix('#') {
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
    }
    body.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && body.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Decode an XML entity reference name to its character value.
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

/// Map HTML entity name to Unicode character.
fn entity_to_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{00a0}",
        "shy" => "\u{00ad}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{00b7}",

        // Quotes
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "lsaquo" => "\u{2039}",
        "rsaquo" => "\u{203a}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",

        // German, French and Italian letters
        "auml" => "\u{00e4}",
        "ouml" => "\u{00f6}",
        "uuml" => "\u{00fc}",
        "Auml" => "\u{00c4}",
        "Ouml" => "\u{00d6}",
        "Uuml" => "\u{00dc}",
        "szlig" => "\u{00df}",
        "agrave" => "\u{00e0}",
        "aacute" => "\u{00e1}",
        "acirc" => "\u{00e2}",
        "ccedil" => "\u{00e7}",
        "egrave" => "\u{00e8}",
        "eacute" => "\u{00e9}",
        "ecirc" => "\u{00ea}",
        "euml" => "\u{00eb}",
        "igrave" => "\u{00ec}",
        "iacute" => "\u{00ed}",
        "icirc" => "\u{00ee}",
        "iuml" => "\u{00ef}",
        "ograve" => "\u{00f2}",
        "oacute" => "\u{00f3}",
        "ocirc" => "\u{00f4}",
        "ugrave" => "\u{00f9}",
        "uacute" => "\u{00fa}",
        "ucirc" => "\u{00fb}",
        "Eacute" => "\u{00c9}",
        "Egrave" => "\u{00c8}",
        "Agrave" => "\u{00c0}",
        "Ccedil" => "\u{00c7}",

        // Legal and currency symbols
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "sect" => "\u{00a7}",
        "para" => "\u{00b6}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "cent" => "\u{00a2}",
        "deg" => "\u{00b0}",
        "times" => "\u{00d7}",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_german_letters() {
        assert_eq!(
            convert_html_entities("Datenschutzerkl&auml;rung &amp; Gr&uuml;sse"),
            "Datenschutzerkl\u{00e4}rung &amp; Gr\u{00fc}sse"
        );
    }

    #[test]
    fn test_convert_preserves_unknown() {
        assert_eq!(convert_html_entities("&colon;"), "&colon;");
    }

    #[test]
    fn test_escape_bare_ampersands() {
        assert_eq!(
            escape_bare_ampersands("Fragen & Antworten &amp; &#169; &#xA9; &x"),
            "Fragen &amp; Antworten &amp; &#169; &#xA9; &amp;x"
        );
    }

    #[test]
    fn test_escape_bare_ampersand_with_distant_semicolon() {
        assert_eq!(escape_bare_ampersands("a & b; c"), "a &amp; b; c");
    }

    #[test]
    fn test_decode_entity_numeric() {
        assert_eq!(decode_entity("#60"), "<");
        assert_eq!(decode_entity("#x3E"), ">");
        assert_eq!(decode_entity("amp"), "&");
        assert_eq!(decode_entity("bogus"), "&bogus;");
    }
}

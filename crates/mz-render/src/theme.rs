//! Theme colors as CSS custom properties.

use std::collections::BTreeMap;

/// Characters that would let a value escape its declaration.
const FORBIDDEN: &[char] = &[';', '{', '}', '<', '>', '"', '\\'];

/// Turn CMS theme colors into `--color-{key}` custom properties.
///
/// Empty values are skipped, as are keys and values that could break out of
/// a declaration.
#[must_use]
pub fn theme_properties(colors: &BTreeMap<String, String>) -> Vec<(String, String)> {
    colors
        .iter()
        .filter(|(key, value)| {
            let valid_key = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            let value = value.trim();
            valid_key && !value.is_empty() && !value.contains(FORBIDDEN)
        })
        .map(|(key, value)| (format!("--color-{key}"), value.trim().to_owned()))
        .collect()
}

/// Theme colors as a `:root` rule, empty if there are none.
#[must_use]
pub fn theme_style(colors: &BTreeMap<String, String>) -> String {
    let properties = theme_properties(colors);
    if properties.is_empty() {
        return String::new();
    }

    let mut css = String::from(":root {");
    for (name, value) in properties {
        css.push_str(&format!(" {name}: {value};"));
    }
    css.push_str(" }");
    css
}

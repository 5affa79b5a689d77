//! Template-driven list rendering.

use mz_content::AssetRef;
use mz_html::{HtmlElement, HtmlNode, Policy, sanitize_fragment};
use serde_json::Value;

use crate::RenderContext;
use crate::image::resolve_image;
use crate::page::{Template, for_each_element_mut};

/// Item properties that carry rich text.
const RICH_TEXT_PROPS: &[&str] = &["answer", "content", "bioShort"];

/// JavaScript-style truthiness of a JSON value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text of a scalar value; falsy and structured values are empty.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(true) if is_truthy(value) => value.to_string(),
        _ => String::new(),
    }
}

/// Fill one copy of `template` with `item`.
///
/// Elements with `data-prop` receive the item's property of that name:
///
/// - `img` elements get `src` (see [`resolve_image`]) and an `alt` taken from
///   the item's `name` or `title`; unresolvable images are left alone
/// - rich-text properties (`answer`, `content`, `bioShort`) are sanitized with
///   the basic policy
/// - everything else becomes plain text
///
/// Elements that also carry `data-cms-attr` additionally get the named
/// attribute set to the property value when it is truthy.
#[must_use]
pub fn fill_template(template: &Template, item: &Value, ctx: &RenderContext) -> Vec<HtmlNode> {
    let mut nodes = template.instantiate();
    for_each_element_mut(&mut nodes, &mut |el| fill_element(el, item, ctx));
    nodes
}

fn fill_element(el: &mut HtmlElement, item: &Value, ctx: &RenderContext) {
    let Some(prop) = el.attr("data-prop").map(str::to_owned) else {
        return;
    };
    let value = item.get(&prop).unwrap_or(&Value::Null);

    if el.tag == "img" {
        if let Some(src) = resolve_image(AssetRef::from_value(value).as_ref(), ctx) {
            el.set_attr("src", src);
            el.set_attr("alt", alt_text(item));
        }
    } else if RICH_TEXT_PROPS.contains(&prop.as_str()) {
        el.replace_children(sanitize_fragment(&value_text(value), Policy::Basic));
    } else {
        let text = value_text(value);
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![HtmlNode::Text(text)]
        };
        el.replace_children(children);
    }

    if let Some(attr_name) = el.attr("data-cms-attr").map(str::to_owned)
        && is_truthy(value)
    {
        el.set_attr(attr_name, value_text(value));
    }
}

/// `name`, else `title`, else empty.
fn alt_text(item: &Value) -> String {
    ["name", "title"]
        .iter()
        .filter_map(|key| item.get(key))
        .find(|v| is_truthy(v))
        .map(value_text)
        .unwrap_or_default()
}

/// Render `items` through `template`, concatenating the copies.
#[must_use]
pub fn render_items(template: &Template, items: &[Value], ctx: &RenderContext) -> Vec<HtmlNode> {
    items
        .iter()
        .flat_map(|item| fill_template(template, item, ctx))
        .collect()
}

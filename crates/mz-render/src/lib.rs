//! Rendering of CMS content into page shells.
//!
//! Everything here works on virtual node trees from [`mz_html`]: a [`Page`] is
//! a trusted shell with addressable slots (`data-cms`, `data-cms-src`,
//! `data-cms-list`, navigation attributes, element ids) and the renderers
//! fill those slots. Text is escaped by the tree on output; CMS rich text is
//! sanitized before it is inserted.
//!
//! A missing slot is never an error: it is logged and the page is left as it
//! was.
//!
//! # Example
//!
//! ```
//! use mz_render::{Page, RenderContext, Renderer};
//!
//! let page = Page::parse(r#"<h1 data-cms="brandName">Laden...</h1>"#).unwrap();
//! let mut renderer = Renderer::new(page, RenderContext::default());
//! renderer.set_text("brandName", Some("Maklerzentrum <Schweiz>"));
//! assert_eq!(
//!     renderer.to_html(),
//!     r#"<h1 data-cms="brandName">Maklerzentrum &lt;Schweiz&gt;</h1>"#
//! );
//! ```

mod accessibility;
mod content;
mod image;
mod list;
mod navigation;
mod page;
mod theme;

use std::collections::BTreeMap;

use mz_config::Config;
use mz_content::{AssetRef, FaqItem, Module, Navigation, SiteSettings};
use mz_html::{HtmlElement, HtmlNode, Policy};
use serde_json::Value;

pub use accessibility::{accessible_html, improve_accessibility};
pub use content::{NO_FAQS, NO_MODULES, faq_nodes, module_nodes, render_faqs, render_modules};
pub use image::resolve_image;
pub use list::{fill_template, render_items};
pub use navigation::{
    FOOTER_GROUP_ATTR, MAIN_NAV_ATTR, MOBILE_LEGAL_ATTR, footer_group, main_links,
    mobile_legal_block, render_navigation,
};
pub use page::{Page, Selector, Template};
pub use theme::{theme_properties, theme_style};

/// Text slot attribute.
pub const TEXT_ATTR: &str = "data-cms";
/// Image slot attribute.
pub const SRC_ATTR: &str = "data-cms-src";
/// List container attribute, valued with the list name.
pub const LIST_ATTR: &str = "data-cms-list";
/// Template id on a list container.
pub const TEMPLATE_ATTR: &str = "data-template";

/// Settings that influence how content is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Asset ids cannot be resolved without a CMS.
    pub mock_mode: bool,
    /// Directus base URL for asset links.
    pub directus_url: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            mock_mode: true,
            directus_url: String::new(),
        }
    }
}

impl RenderContext {
    /// Context for the given configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            mock_mode: config.is_mock_mode(),
            directus_url: config.cms.directus_url.clone(),
        }
    }
}

/// Page title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// Document title.
    pub title: Option<String>,
    /// `meta[name=description]` content.
    pub description: Option<String>,
}

/// Fills the slots of one page.
#[derive(Debug, Clone)]
pub struct Renderer {
    page: Page,
    ctx: RenderContext,
}

impl Renderer {
    /// Renderer over `page`.
    #[must_use]
    pub fn new(page: Page, ctx: RenderContext) -> Self {
        Self { page, ctx }
    }

    /// The page in its current state.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Finish rendering and return the page.
    #[must_use]
    pub fn into_page(self) -> Page {
        self.page
    }

    /// Serialize the page.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.page.to_html()
    }

    /// Set the text of every `[data-cms=key]` element. `None` clears them.
    pub fn set_text(&mut self, key: &str, value: Option<&str>) -> usize {
        let text: Vec<HtmlNode> = value
            .filter(|v| !v.is_empty())
            .map(HtmlNode::text)
            .into_iter()
            .collect();
        self.page.fill(&Selector::attr(TEXT_ATTR, key), &text)
    }

    /// Point every `[data-cms-src=key]` element at `asset`.
    ///
    /// Elements keep their current `src` when the asset does not resolve.
    pub fn set_src(&mut self, key: &str, asset: Option<&AssetRef>) -> usize {
        let selector = Selector::attr(SRC_ATTR, key);
        let Some(src) = resolve_image(asset, &self.ctx) else {
            return self.page.select(&selector).len();
        };
        self.page
            .update(&selector, |_, el| el.set_attr("src", src.as_str()))
    }

    /// Sanitize `html` with `policy` and insert it into the first element
    /// matching `selector`, followed by the accessibility pass.
    pub fn render_html(&mut self, selector: &Selector, html: &str, policy: Policy) -> bool {
        let nodes = accessible_html(html, policy);
        let mut done = false;
        self.page.update(selector, |_, el| {
            if !done {
                el.replace_children(nodes.clone());
                done = true;
            }
        });
        if done {
            tracing::debug!(%selector, length = html.len(), "Rendered HTML");
        } else {
            tracing::warn!(%selector, "Render target not found");
        }
        done
    }

    /// Fill every `[data-cms-list=name]` container with one template copy
    /// per item.
    ///
    /// The template is the `<template>` element with id `template_id`, or the
    /// one named by the container's `data-template`. Containers without a
    /// template are logged and left alone. Returns the number of filled
    /// containers.
    pub fn render_list(&mut self, name: &str, items: &[Value], template_id: Option<&str>) -> usize {
        let selector = Selector::attr(LIST_ATTR, name);

        let rendered: Vec<Option<Vec<HtmlNode>>> = self
            .page
            .select(&selector)
            .into_iter()
            .map(|container| {
                let id = template_id.or_else(|| container.attr(TEMPLATE_ATTR));
                let Some(template) = id.and_then(|id| self.page.template(id)) else {
                    tracing::warn!(list = name, template = ?id, "Template not found for list");
                    return None;
                };
                Some(render_items(&template, items, &self.ctx))
            })
            .collect();

        if rendered.is_empty() {
            tracing::warn!(%selector, "Render target not found");
            return 0;
        }

        let mut filled = 0;
        self.page.update(&selector, |i, el| {
            if let Some(Some(nodes)) = rendered.get(i) {
                el.replace_children(nodes.clone());
                filled += 1;
            }
        });
        filled
    }

    /// Fill the navigation slots.
    pub fn render_navigation(&mut self, nav: &Navigation) {
        render_navigation(&mut self.page, nav);
    }

    /// Fill `#container_id` with the FAQ accordion.
    pub fn render_faqs(&mut self, container_id: &str, faqs: &[FaqItem]) -> bool {
        render_faqs(&mut self.page, container_id, faqs)
    }

    /// Fill `#container_id` with module cards.
    pub fn render_modules(&mut self, container_id: &str, modules: &[Module]) -> bool {
        render_modules(&mut self.page, container_id, modules)
    }

    /// Fill the site-wide slots: brand, claim, contact, logo and theme.
    pub fn render_site(&mut self, site: &SiteSettings) {
        self.set_text("brandName", Some(site.brand_name.as_str()));
        self.set_text("claim", Some(site.claim.as_str()));
        self.set_text("contactEmail", Some(site.contact.email.as_str()));
        self.set_text("contactPhone", Some(site.contact.phone.as_str()));
        self.set_text("contactAddress", Some(site.contact.address.as_str()));
        self.set_src("logo", site.logo.as_ref());
        self.apply_theme(&site.colors);
    }

    /// Set theme colors as custom properties on the `<html>` element.
    ///
    /// Existing `--color-*` declarations are replaced, other inline styles
    /// kept. Pages without an `<html>` element are left alone.
    pub fn apply_theme(&mut self, colors: &BTreeMap<String, String>) -> bool {
        let properties = theme_properties(colors);
        if properties.is_empty() {
            return false;
        }

        let updated = self.page.update(&Selector::tag("html"), |_, el| {
            let mut declarations: Vec<String> = el
                .attr("style")
                .unwrap_or_default()
                .split(';')
                .map(str::trim)
                .filter(|d| !d.is_empty() && !d.starts_with("--color-"))
                .map(str::to_owned)
                .collect();
            declarations.extend(properties.iter().map(|(name, value)| format!("{name}: {value}")));
            el.set_attr("style", declarations.join("; "));
        });
        if updated > 0 {
            tracing::debug!(count = properties.len(), "Applied theme colors");
        }
        updated > 0
    }

    /// Update the document title and meta description.
    ///
    /// A missing `meta[name=description]` is appended to `<head>`.
    pub fn update_page_meta(&mut self, meta: &PageMeta) {
        if let Some(title) = meta.title.as_deref().filter(|t| !t.is_empty()) {
            self.page.fill(&Selector::tag("title"), &[HtmlNode::text(title)]);
        }

        if let Some(description) = meta.description.as_deref().filter(|d| !d.is_empty()) {
            let selector = Selector::attr("name", "description");
            let updated = self
                .page
                .update(&selector, |_, el| el.set_attr("content", description));
            if updated == 0 {
                let meta_el = HtmlElement::new("meta")
                    .with_attr("name", "description")
                    .with_attr("content", description);
                self.page.update(&Selector::tag("head"), |_, head| {
                    head.children.push(meta_el.clone().into());
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn renderer(html: &str) -> Renderer {
        Renderer::new(
            Page::parse(html).unwrap(),
            RenderContext {
                mock_mode: false,
                directus_url: "https://cms.example.ch/".to_owned(),
            },
        )
    }

    #[test]
    fn test_set_text_missing_value_clears() {
        let mut r = renderer(r#"<p data-cms="claim">Laden...</p>"#);
        assert_eq!(r.set_text("claim", None), 1);
        assert_eq!(r.to_html(), r#"<p data-cms="claim"></p>"#);
    }

    #[test]
    fn test_set_text_missing_target() {
        let mut r = renderer("<p>x</p>");
        assert_eq!(r.set_text("claim", Some("y")), 0);
        assert_eq!(r.to_html(), "<p>x</p>");
    }

    #[test]
    fn test_set_src() {
        let mut r = renderer(r#"<img data-cms-src="logo" src="default.svg">"#);
        let asset = AssetRef {
            url: None,
            id: Some("abc".to_owned()),
        };
        r.set_src("logo", Some(&asset));
        assert_eq!(
            r.to_html(),
            r#"<img data-cms-src="logo" src="https://cms.example.ch/assets/abc">"#
        );
    }

    #[test]
    fn test_set_src_keeps_default_in_mock_mode() {
        let mut r = Renderer::new(
            Page::parse(r#"<img data-cms-src="logo" src="default.svg">"#).unwrap(),
            RenderContext::default(),
        );
        let asset = AssetRef {
            url: None,
            id: Some("abc".to_owned()),
        };
        r.set_src("logo", Some(&asset));
        assert_eq!(r.to_html(), r#"<img data-cms-src="logo" src="default.svg">"#);
    }

    #[test]
    fn test_render_html_sanitizes_and_improves() {
        let mut r = renderer(r#"<article id="imprint"></article>"#);
        let done = r.render_html(
            &Selector::id("imprint"),
            r#"<p>Siehe <a href="https://reteach.ch">Reteach</a></p><script>x()</script>"#,
            Policy::Legal,
        );
        assert!(done);
        assert_eq!(
            r.to_html(),
            r#"<article id="imprint"><p>Siehe <a href="https://reteach.ch" target="_blank" rel="noopener">Reteach</a></p>x()</article>"#
        );
    }

    #[test]
    fn test_render_html_missing_target() {
        let mut r = renderer("<main></main>");
        assert!(!r.render_html(&Selector::id("imprint"), "<p>x</p>", Policy::Legal));
    }

    #[test]
    fn test_render_list_with_container_template() {
        let mut r = renderer(concat!(
            r#"<ul data-cms-list="team" data-template="member">Laden...</ul>"#,
            r#"<template id="member"><li data-prop="name"></li></template>"#,
        ));

        let filled = r.render_list(
            "team",
            &[json!({"name": "Anna"}), json!({"name": "Beat"})],
            None,
        );

        assert_eq!(filled, 1);
        assert_eq!(
            r.page().find(&Selector::attr(LIST_ATTR, "team")).unwrap().text_content(),
            "AnnaBeat"
        );
    }

    #[test]
    fn test_render_list_missing_template_leaves_container() {
        let mut r = renderer(r#"<ul data-cms-list="team">Laden...</ul>"#);
        assert_eq!(r.render_list("team", &[json!({"name": "Anna"})], Some("nope")), 0);
        assert_eq!(r.to_html(), r#"<ul data-cms-list="team">Laden...</ul>"#);
    }

    #[test]
    fn test_render_list_explicit_template_wins() {
        let mut r = renderer(concat!(
            r#"<div data-cms-list="news" data-template="a"></div>"#,
            r#"<template id="a"><p data-prop="title"></p></template>"#,
            r#"<template id="b"><h3 data-prop="title"></h3></template>"#,
        ));
        r.render_list("news", &[json!({"title": "Neu"})], Some("b"));
        assert!(r.to_html().starts_with(
            r#"<div data-cms-list="news" data-template="a"><h3 data-prop="title">Neu</h3></div>"#
        ));
    }

    #[test]
    fn test_apply_theme_sets_custom_properties() {
        let mut r =
            renderer(r#"<html style="margin: 0; --color-primary: red"><body></body></html>"#);
        let colors = BTreeMap::from([
            ("primary".to_owned(), "#0a3d62".to_owned()),
            ("accent".to_owned(), "#f39c12".to_owned()),
        ]);

        assert!(r.apply_theme(&colors));
        assert_eq!(
            r.page().find(&Selector::tag("html")).unwrap().attr("style"),
            Some("margin: 0; --color-accent: #f39c12; --color-primary: #0a3d62")
        );
    }

    #[test]
    fn test_apply_theme_without_colors() {
        let mut r = renderer("<html></html>");
        assert!(!r.apply_theme(&BTreeMap::new()));
        assert_eq!(r.to_html(), "<html></html>");
    }

    #[test]
    fn test_render_site() {
        let mut r = renderer(concat!(
            r#"<span data-cms="brandName"></span><a data-cms="contactEmail"></a>"#,
            r#"<img data-cms-src="logo" src="logo.svg">"#,
        ));
        let site = SiteSettings {
            brand_name: "Maklerzentrum".to_owned(),
            ..SiteSettings::default()
        };

        r.render_site(&site);

        assert_eq!(
            r.to_html(),
            concat!(
                r#"<span data-cms="brandName">Maklerzentrum</span><a data-cms="contactEmail"></a>"#,
                r#"<img data-cms-src="logo" src="logo.svg">"#,
            )
        );
    }

    #[test]
    fn test_update_page_meta() {
        let mut r = renderer("<html><head><title>alt</title></head><body></body></html>");
        r.update_page_meta(&PageMeta {
            title: Some("FAQ | Maklerzentrum".to_owned()),
            description: Some("Fragen & Antworten".to_owned()),
        });
        assert_eq!(
            r.to_html(),
            concat!(
                "<html><head><title>FAQ | Maklerzentrum</title>",
                r#"<meta name="description" content="Fragen &amp; Antworten"></head>"#,
                "<body></body></html>",
            )
        );

        r.update_page_meta(&PageMeta {
            title: None,
            description: Some("Neu".to_owned()),
        });
        assert!(r.to_html().contains(r#"<meta name="description" content="Neu">"#));
        assert_eq!(r.page().select(&Selector::attr("name", "description")).len(), 1);
    }
}

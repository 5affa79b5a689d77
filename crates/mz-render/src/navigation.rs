//! Navigation markup.
//!
//! Labels and URLs come from the CMS and are trusted; they are not sanitized
//! but the node tree escapes them on output.

use mz_content::{FooterGroup, MobileLegalBlock, NavLink, Navigation};
use mz_html::{HtmlElement, HtmlNode};

use crate::page::{Page, Selector};

/// Slot for the main menu.
pub const MAIN_NAV_ATTR: &str = "data-cms-nav";
/// Slot attribute for a footer group, valued with the group title.
pub const FOOTER_GROUP_ATTR: &str = "data-cms-footer-group";
/// Slot for the mobile legal block.
pub const MOBILE_LEGAL_ATTR: &str = "data-cms-mobile-legal";

fn anchor(link: &NavLink, class: &str) -> HtmlElement {
    let mut a = HtmlElement::new("a")
        .with_attr("href", link.url.as_str())
        .with_class(class);
    if let Some(target) = link.target.as_deref().filter(|t| !t.is_empty()) {
        a.set_attr("target", target);
    }
    a.with_text(link.label.as_str())
}

/// Main menu links.
#[must_use]
pub fn main_links(links: &[NavLink]) -> Vec<HtmlNode> {
    links.iter().map(|l| anchor(l, "nav-link").into()).collect()
}

/// Footer group heading followed by its link list.
#[must_use]
pub fn footer_group(group: &FooterGroup) -> Vec<HtmlNode> {
    vec![
        HtmlElement::new("h4").with_text(group.title.as_str()).into(),
        HtmlElement::new("div")
            .with_class("footer-links")
            .with_children(group.links.iter().map(|l| anchor(l, "footer-link").into()))
            .into(),
    ]
}

/// Toggle button and link list of the mobile legal block.
#[must_use]
pub fn mobile_legal_block(block: &MobileLegalBlock) -> Vec<HtmlNode> {
    let mut toggle = HtmlElement::new("button").with_class("mobile-legal-toggle");
    if !block.collapsed {
        toggle.set_attr("class", "mobile-legal-toggle active");
    }
    let toggle = toggle
        .with_attr("aria-expanded", (!block.collapsed).to_string())
        .with_text(block.title.as_str())
        .with_child(HtmlElement::new("span").with_class("toggle-icon").with_text("+"));

    let list_class = if block.collapsed {
        "mobile-legal-links collapsed"
    } else {
        "mobile-legal-links"
    };
    let list = HtmlElement::new("ul").with_class(list_class).with_children(
        block
            .links
            .iter()
            .map(|l| HtmlElement::new("li").with_child(anchor(l, "mobile-legal-link")).into()),
    );

    vec![toggle.into(), list.into()]
}

/// Fill the navigation slots of `page`.
///
/// Sections absent from `nav` leave their slots untouched. Footer groups are
/// matched to slots by title.
pub fn render_navigation(page: &mut Page, nav: &Navigation) {
    if let Some(main) = &nav.main {
        page.fill(&Selector::attr(MAIN_NAV_ATTR, "main"), &main_links(main));
    }

    for group in nav.footer_groups.iter().flatten() {
        page.fill(
            &Selector::attr(FOOTER_GROUP_ATTR, group.title.as_str()),
            &footer_group(group),
        );
    }

    if let Some(block) = &nav.mobile_legal_block {
        page.fill(&Selector::has_attr(MOBILE_LEGAL_ATTR), &mobile_legal_block(block));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_html::to_html;
    use pretty_assertions::assert_eq;

    fn nav_link(label: &str, url: &str) -> NavLink {
        NavLink {
            label: label.to_owned(),
            url: url.to_owned(),
            target: None,
        }
    }

    #[test]
    fn test_main_links() {
        let links = vec![
            nav_link("Schulung", "/schulung"),
            NavLink {
                target: Some("_blank".to_owned()),
                ..nav_link("Login", "https://reteach.ch")
            },
        ];
        assert_eq!(
            to_html(&main_links(&links)),
            concat!(
                r#"<a href="/schulung" class="nav-link">Schulung</a>"#,
                r#"<a href="https://reteach.ch" class="nav-link" target="_blank">Login</a>"#,
            )
        );
    }

    #[test]
    fn test_labels_are_escaped() {
        let html = to_html(&main_links(&[nav_link("<script>x</script>", "/a\"b")]));
        assert_eq!(
            html,
            r#"<a href="/a&quot;b" class="nav-link">&lt;script&gt;x&lt;/script&gt;</a>"#
        );
    }

    #[test]
    fn test_footer_group() {
        let group = FooterGroup {
            title: "Rechtliches".to_owned(),
            links: vec![nav_link("Impressum", "/impressum")],
        };
        assert_eq!(
            to_html(&footer_group(&group)),
            concat!(
                "<h4>Rechtliches</h4>",
                r#"<div class="footer-links"><a href="/impressum" class="footer-link">Impressum</a></div>"#,
            )
        );
    }

    #[test]
    fn test_mobile_legal_block_states() {
        let mut block = MobileLegalBlock {
            title: "Rechtliches".to_owned(),
            collapsed: true,
            links: vec![nav_link("AGB", "/agb")],
        };
        assert_eq!(
            to_html(&mobile_legal_block(&block)),
            concat!(
                r#"<button class="mobile-legal-toggle" aria-expanded="false">Rechtliches<span class="toggle-icon">+</span></button>"#,
                r#"<ul class="mobile-legal-links collapsed"><li><a href="/agb" class="mobile-legal-link">AGB</a></li></ul>"#,
            )
        );

        block.collapsed = false;
        let html = to_html(&mobile_legal_block(&block));
        assert!(html.starts_with(
            r#"<button class="mobile-legal-toggle active" aria-expanded="true">"#
        ));
        assert!(html.contains(r#"<ul class="mobile-legal-links">"#));
    }

    #[test]
    fn test_render_navigation_fills_slots() {
        let mut page = Page::parse(concat!(
            r#"<nav data-cms-nav="main">alt</nav>"#,
            r#"<div data-cms-footer-group="Kontakt"></div>"#,
            r#"<div data-cms-footer-group="Rechtliches">bleibt</div>"#,
            "<div data-cms-mobile-legal=\"\">bleibt</div>",
        ))
        .unwrap();
        let nav = Navigation {
            main: Some(vec![nav_link("Home", "/")]),
            footer_groups: Some(vec![FooterGroup {
                title: "Kontakt".to_owned(),
                links: Vec::new(),
            }]),
            mobile_legal_block: None,
        };

        render_navigation(&mut page, &nav);

        assert_eq!(
            page.to_html(),
            concat!(
                r#"<nav data-cms-nav="main"><a href="/" class="nav-link">Home</a></nav>"#,
                r#"<div data-cms-footer-group="Kontakt"><h4>Kontakt</h4><div class="footer-links"></div></div>"#,
                r#"<div data-cms-footer-group="Rechtliches">bleibt</div>"#,
                r#"<div data-cms-mobile-legal="">bleibt</div>"#,
            )
        );
    }

    #[test]
    fn test_empty_main_clears_slot() {
        let mut page = Page::parse(r#"<nav data-cms-nav="main">alt</nav>"#).unwrap();
        render_navigation(
            &mut page,
            &Navigation {
                main: Some(Vec::new()),
                ..Navigation::default()
            },
        );
        assert_eq!(page.to_html(), r#"<nav data-cms-nav="main"></nav>"#);
    }
}

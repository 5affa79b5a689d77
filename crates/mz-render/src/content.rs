//! FAQ accordion and module card markup.

use mz_content::{FaqItem, Module};
use mz_html::{HtmlElement, HtmlNode, Policy, sanitize_fragment};

use crate::page::{Page, Selector};

/// Shown in place of an empty FAQ list.
pub const NO_FAQS: &str = "Keine FAQs verfügbar.";
/// Shown in place of an empty module list.
pub const NO_MODULES: &str = "Keine Module verfügbar.";

fn empty_state(message: &str) -> HtmlNode {
    HtmlElement::new("div")
        .with_class("text-center py-12 text-gray-500")
        .with_text(message)
        .into()
}

/// Visible entries, stable-sorted by `order`.
fn visible_sorted<'a, T>(
    items: &'a [T],
    visible: impl Fn(&T) -> bool,
    order: impl Fn(&T) -> i64,
) -> Vec<&'a T> {
    let mut shown: Vec<&T> = items.iter().filter(|item| visible(*item)).collect();
    shown.sort_by_key(|item| order(*item));
    shown
}

fn faq_item(faq: &FaqItem) -> HtmlElement {
    let trigger = HtmlElement::new("button")
        .with_class("faq-trigger")
        .with_attr("aria-expanded", "false")
        .with_attr("role", "button")
        .with_child(HtmlElement::new("span").with_text(faq.question.as_str()));

    let answer = HtmlElement::new("div")
        .with_class("faq-content")
        .with_attr("role", "region")
        .with_child(
            HtmlElement::new("div").with_children(sanitize_fragment(&faq.answer, Policy::Basic)),
        );

    let mut item = HtmlElement::new("div").with_class("faq-item");
    if faq.featured {
        item.set_attr("class", "faq-item featured");
    }
    item.with_attr("data-topic", faq.topic.as_str())
        .with_child(trigger)
        .with_child(answer)
}

/// Accordion markup for the visible FAQ entries.
///
/// Questions are escaped; answers are sanitized with the basic policy. With
/// nothing to show, the result is the empty-state message.
#[must_use]
pub fn faq_nodes(faqs: &[FaqItem]) -> Vec<HtmlNode> {
    let shown = visible_sorted(faqs, |f| f.visible, |f| f.order);
    if shown.is_empty() {
        return vec![empty_state(NO_FAQS)];
    }
    shown.into_iter().map(|f| faq_item(f).into()).collect()
}

fn module_card(module: &Module) -> HtmlElement {
    let badge = if module.is_online() {
        HtmlElement::new("span").with_class("badge bg-blue").with_text("Online")
    } else {
        HtmlElement::new("span").with_class("badge bg-green").with_text("Präsenz")
    };

    let mut card = HtmlElement::new("div")
        .with_class("module-card")
        .with_child(
            HtmlElement::new("div")
                .with_class("module-header")
                .with_child(HtmlElement::new("h3").with_text(module.title.as_str()))
                .with_child(badge),
        )
        .with_child(
            HtmlElement::new("p")
                .with_class("module-duration")
                .with_text(format!("{} Tage", module.duration_days)),
        );

    if !module.bullets.is_empty() {
        card = card.with_child(HtmlElement::new("ul").with_class("space-y-2 mt-4").with_children(
            module.bullets.iter().map(|bullet| {
                HtmlElement::new("li")
                    .with_child(HtmlElement::new("span").with_text(bullet.as_str()))
                    .into()
            }),
        ));
    }

    if !module.slug.is_empty() {
        card.set_attr("data-slug", module.slug.as_str());
    }
    card
}

/// Card markup for the visible modules.
#[must_use]
pub fn module_nodes(modules: &[Module]) -> Vec<HtmlNode> {
    let shown = visible_sorted(modules, |m| m.visible, |m| m.order);
    if shown.is_empty() {
        return vec![empty_state(NO_MODULES)];
    }
    shown.into_iter().map(|m| module_card(m).into()).collect()
}

/// Fill the element with id `container_id` with the FAQ accordion.
///
/// Returns `false` (and logs) if the container does not exist.
pub fn render_faqs(page: &mut Page, container_id: &str, faqs: &[FaqItem]) -> bool {
    render_into(page, container_id, &faq_nodes(faqs), "FAQ")
}

/// Fill the element with id `container_id` with module cards.
///
/// Returns `false` (and logs) if the container does not exist.
pub fn render_modules(page: &mut Page, container_id: &str, modules: &[Module]) -> bool {
    render_into(page, container_id, &module_nodes(modules), "Modules")
}

fn render_into(page: &mut Page, container_id: &str, nodes: &[HtmlNode], what: &str) -> bool {
    let selector = Selector::id(container_id);
    if page.find(&selector).is_none() {
        tracing::error!(container = container_id, "{what} container not found");
        return false;
    }
    page.fill(&selector, nodes);
    tracing::debug!(container = container_id, count = nodes.len(), "Rendered {what}");
    true
}

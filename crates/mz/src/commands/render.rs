//! `mz render` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use mz_config::Locale;
use mz_content::{FaqItem, Module, Navigation, SiteSettings};
use mz_html::{HtmlNode, Policy, to_html};
use mz_render::{
    Page, Renderer, Selector, accessible_html, faq_nodes, footer_group, main_links,
    mobile_legal_block, module_nodes, theme_style,
};

use crate::context::{GlobalArgs, SiteContext};
use crate::error::CliError;
use crate::output::Output;

const FAQ_CONTAINER: &str = "faq-accordion";
const MODULES_CONTAINER: &str = "modules-list";
const LEGAL_CONTAINER: &str = "legal-content";

/// What to render.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum RenderTarget {
    /// FAQ accordion.
    Faq,
    /// Training module cards.
    Modules,
    /// Main menu, footer groups and mobile legal block.
    Navigation,
    /// A legal document (see `--field`).
    Legal,
    /// Brand, claim, contact, logo and theme slots (needs `--page`).
    Site,
    /// Theme colors as CSS.
    Theme,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// What to render.
    target: RenderTarget,

    /// Page shell to render into (default: print the fragment alone).
    #[arg(long)]
    page: Option<PathBuf>,

    /// Id of the container element for faq, modules and legal.
    #[arg(long)]
    container: Option<String>,

    /// Legal text to render: `imprintHtml`, `privacyHtml` or `termsHtml`.
    #[arg(long, default_value = "imprintHtml")]
    field: String,

    /// Content locale (overrides config).
    #[arg(short, long)]
    locale: Option<Locale>,
}

impl RenderArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let ctx = SiteContext::load(global, self.locale)?;

        let html = match &self.page {
            Some(path) => {
                let shell = std::fs::read_to_string(path)?;
                let mut renderer = Renderer::new(Page::parse(&shell)?, ctx.render.clone());
                self.render_into(&ctx, &mut renderer)?;
                renderer.to_html()
            }
            None => self.render_fragment(&ctx)?,
        };

        Output::new().data(&html)?;
        Ok(())
    }

    /// Render the target on its own.
    fn render_fragment(&self, ctx: &SiteContext) -> Result<String, CliError> {
        let html = match self.target {
            RenderTarget::Faq => to_html(&faq_nodes(&faqs(ctx))),
            RenderTarget::Modules => to_html(&module_nodes(&modules(ctx))),
            RenderTarget::Navigation => to_html(&navigation_nodes(&navigation(ctx))),
            RenderTarget::Legal => {
                let site = site(ctx);
                to_html(&accessible_html(legal_text(&site, &self.field)?, Policy::Legal))
            }
            RenderTarget::Theme => theme_style(&site(ctx).colors),
            RenderTarget::Site => {
                return Err(CliError::Validation(
                    "rendering site slots requires --page".to_owned(),
                ));
            }
        };
        Ok(html)
    }

    /// Fill the target's slots in `renderer`'s page.
    fn render_into(&self, ctx: &SiteContext, renderer: &mut Renderer) -> Result<(), CliError> {
        let output = Output::new();
        let container = |default: &'static str| self.container.as_deref().unwrap_or(default);

        let found = match self.target {
            RenderTarget::Faq => renderer.render_faqs(container(FAQ_CONTAINER), &faqs(ctx)),
            RenderTarget::Modules => {
                renderer.render_modules(container(MODULES_CONTAINER), &modules(ctx))
            }
            RenderTarget::Navigation => {
                renderer.render_navigation(&navigation(ctx));
                true
            }
            RenderTarget::Legal => {
                let site = site(ctx);
                renderer.render_html(
                    &Selector::id(container(LEGAL_CONTAINER)),
                    legal_text(&site, &self.field)?,
                    Policy::Legal,
                )
            }
            RenderTarget::Site => {
                renderer.render_site(&site(ctx));
                true
            }
            RenderTarget::Theme => renderer.apply_theme(&site(ctx).colors),
        };

        if !found {
            output.warning(&format!(
                "Nothing rendered for {:?}: target not found in page",
                self.target
            ));
        }
        Ok(())
    }
}

fn site(ctx: &SiteContext) -> SiteSettings {
    SiteSettings::from_payload(&ctx.adapter.get_site())
}

fn navigation(ctx: &SiteContext) -> Navigation {
    Navigation::from_payload(&ctx.adapter.get_navigation())
}

fn faqs(ctx: &SiteContext) -> Vec<FaqItem> {
    FaqItem::list_from(&ctx.adapter.load_faqs(ctx.locale()))
}

fn modules(ctx: &SiteContext) -> Vec<Module> {
    Module::list_from(&ctx.adapter.load_modules(ctx.locale()))
}

fn legal_text<'a>(site: &'a SiteSettings, field: &str) -> Result<&'a str, CliError> {
    site.legal.field(field).ok_or_else(|| {
        CliError::Validation(format!(
            "unknown legal field: {field} (expected imprintHtml, privacyHtml or termsHtml)"
        ))
    })
}

/// Every navigation section, in page order.
fn navigation_nodes(nav: &Navigation) -> Vec<HtmlNode> {
    let mut nodes = nav.main.as_deref().map(main_links).unwrap_or_default();
    for group in nav.footer_groups.iter().flatten() {
        nodes.extend(footer_group(group));
    }
    if let Some(block) = &nav.mobile_legal_block {
        nodes.extend(mobile_legal_block(block));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_config::{CmsMode, Config};
    use mz_content::CmsAdapter;
    use mz_render::RenderContext;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn mock_context(dir: &Path) -> SiteContext {
        write(
            dir,
            "site.json",
            r##"{"site_settings": {
                "brandName": "Maklerzentrum",
                "legal": {"imprintHtml": "<h1>Impressum</h1><script>x()</script>"},
                "colors": {"primary": "#0a3d62"}
            }}"##,
        );
        write(
            dir,
            "navigation.json",
            r#"{"navigation": {"main": [{"label": "FAQ", "url": "/faq"}]}}"#,
        );
        write(
            dir,
            "de-CH/faq.json",
            r#"{"faq": [{"question": "Wie?", "answer": "<p>So.</p>"}]}"#,
        );

        let mut config = Config::default();
        config.cms.mode = CmsMode::Mock;
        config.content_dir = dir.to_path_buf();
        let adapter = CmsAdapter::from_config(&config);
        let render = RenderContext::from_config(&config);
        SiteContext {
            config,
            adapter,
            render,
        }
    }

    fn args(target: RenderTarget) -> RenderArgs {
        RenderArgs {
            target,
            page: None,
            container: None,
            field: "imprintHtml".to_owned(),
            locale: None,
        }
    }

    #[test]
    fn test_render_navigation_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mock_context(dir.path());

        let html = args(RenderTarget::Navigation).render_fragment(&ctx).unwrap();

        assert_eq!(html, r#"<a href="/faq" class="nav-link">FAQ</a>"#);
    }

    #[test]
    fn test_render_legal_fragment_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mock_context(dir.path());

        let html = args(RenderTarget::Legal).render_fragment(&ctx).unwrap();

        assert_eq!(html, "<h1>Impressum</h1>x()");
    }

    #[test]
    fn test_unknown_legal_field() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mock_context(dir.path());
        let mut args = args(RenderTarget::Legal);
        args.field = "cookieHtml".to_owned();

        assert!(matches!(
            args.render_fragment(&ctx),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_render_theme_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mock_context(dir.path());

        let css = args(RenderTarget::Theme).render_fragment(&ctx).unwrap();

        assert_eq!(css, ":root { --color-primary: #0a3d62; }");
    }

    #[test]
    fn test_site_requires_page() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mock_context(dir.path());
        assert!(args(RenderTarget::Site).render_fragment(&ctx).is_err());
    }

    #[test]
    fn test_render_faq_into_page() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mock_context(dir.path());
        let page = Page::parse(r#"<main><div id="faq-accordion">Laden...</div></main>"#).unwrap();
        let mut renderer = Renderer::new(page, ctx.render.clone());

        args(RenderTarget::Faq)
            .render_into(&ctx, &mut renderer)
            .unwrap();

        let html = renderer.to_html();
        assert!(html.contains(r#"<span>Wie?</span>"#));
        assert!(html.contains("<p>So.</p>"));
        assert!(!html.contains("Laden..."));
    }
}

//! `mz site`, `mz navigation`, `mz faq`, `mz modules` and `mz refresh`.

use clap::Args;
use mz_config::Locale;
use mz_content::ContentRequest;
use serde_json::Value;

use crate::context::{GlobalArgs, SiteContext};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the content commands.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Content locale (overrides config).
    #[arg(short, long)]
    locale: Option<Locale>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

impl ContentArgs {
    pub(crate) fn execute_site(self, global: &GlobalArgs) -> Result<(), CliError> {
        let ctx = SiteContext::load(global, self.locale)?;
        self.print_resolved(&ctx, ContentRequest::site())
    }

    pub(crate) fn execute_navigation(self, global: &GlobalArgs) -> Result<(), CliError> {
        let ctx = SiteContext::load(global, self.locale)?;
        self.print_resolved(&ctx, ContentRequest::navigation())
    }

    pub(crate) fn execute_faq(self, global: &GlobalArgs) -> Result<(), CliError> {
        let ctx = SiteContext::load(global, self.locale)?;
        self.print_resolved(&ctx, ContentRequest::faq(ctx.locale()))
    }

    pub(crate) fn execute_modules(self, global: &GlobalArgs) -> Result<(), CliError> {
        let ctx = SiteContext::load(global, self.locale)?;
        self.print_resolved(&ctx, ContentRequest::modules(ctx.locale()))
    }

    /// Clear the cache and print the freshly fetched site settings envelope.
    pub(crate) fn execute_refresh(self, global: &GlobalArgs) -> Result<(), CliError> {
        let ctx = SiteContext::load(global, self.locale)?;
        let envelope = ctx.adapter.refresh();
        self.print_json(&envelope)?;
        Output::new().success("Cache cleared, site settings reloaded");
        Ok(())
    }

    fn print_resolved(&self, ctx: &SiteContext, request: ContentRequest) -> Result<(), CliError> {
        let resolved = ctx.adapter.resolve(&request);
        Output::new().note(&format!("{request} from {}", resolved.origin));
        self.print_json(resolved.payload(request.kind))
    }

    fn print_json(&self, value: &Value) -> Result<(), CliError> {
        let text = format_json(value, self.compact)?;
        Output::new().data(&text)?;
        Ok(())
    }
}

/// Serialize `value` for output.
pub(crate) fn format_json(value: &Value, compact: bool) -> Result<String, serde_json::Error> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

//! `mz sanitize` command implementation.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use mz_html::{Policy, sanitize, to_html};
use mz_render::accessible_html;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sanitize command.
#[derive(Args)]
pub(crate) struct SanitizeArgs {
    /// HTML file to sanitize (default: stdin).
    file: Option<PathBuf>,

    /// Sanitizer policy: `legal` or `basic`.
    #[arg(short, long, default_value = "legal")]
    policy: Policy,

    /// Also apply the accessibility pass (skip navigation, external links).
    #[arg(long)]
    accessible: bool,
}

impl SanitizeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let html = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut html = String::new();
                std::io::stdin().read_to_string(&mut html)?;
                html
            }
        };

        let cleaned = clean(&html, self.policy, self.accessible);
        Output::new().data(&cleaned)?;
        Ok(())
    }
}

fn clean(html: &str, policy: Policy, accessible: bool) -> String {
    if accessible {
        to_html(&accessible_html(html, policy))
    } else {
        sanitize(Some(html), policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_plain() {
        assert_eq!(
            clean("<p>Hallo<script>x()</script></p>", Policy::Legal, false),
            "<p>Hallox()</p>"
        );
    }

    #[test]
    fn test_clean_accessible() {
        assert_eq!(
            clean(r#"<a href="https://reteach.ch">x</a>"#, Policy::Basic, true),
            r#"<a href="https://reteach.ch" target="_blank" rel="noopener">x</a>"#
        );
    }
}

//! Shared command context built from configuration.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use mz_config::{CliSettings, CmsMode, Config, Locale};
use mz_content::CmsAdapter;
use mz_render::RenderContext;

use crate::error::CliError;

/// Content source selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ModeArg {
    /// Derive from the hostname.
    Auto,
    /// Bundled static JSON.
    Mock,
    /// Live CMS.
    Live,
}

impl From<ModeArg> for CmsMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => Self::Auto,
            ModeArg::Mock => Self::Mock,
            ModeArg::Live => Self::Live,
        }
    }
}

/// Flags shared by all commands.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover mz.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hostname used for mock mode detection (overrides config).
    #[arg(long, global = true, env = "MZ_HOSTNAME")]
    hostname: Option<String>,

    /// Content source (overrides config).
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeArg>,

    /// Static content directory (overrides config).
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Disable the content cache.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load configuration with these flags applied.
    pub(crate) fn load_config(&self, locale: Option<Locale>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            hostname: self.hostname.clone(),
            mode: self.mode.map(CmsMode::from),
            locale,
            content_dir: self.content_dir.clone(),
            cache_enabled: self.no_cache.then_some(false),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Everything a command needs, built once from configuration.
pub(crate) struct SiteContext {
    pub config: Config,
    pub adapter: CmsAdapter,
    pub render: RenderContext,
}

impl SiteContext {
    /// Load configuration and build the adapter and render context.
    pub(crate) fn load(global: &GlobalArgs, locale: Option<Locale>) -> Result<Self, CliError> {
        let config = global.load_config(locale)?;
        let adapter = CmsAdapter::from_config(&config);
        let render = RenderContext::from_config(&config);

        tracing::info!(
            mock = config.is_mock_mode(),
            sources = ?adapter.source_names(),
            "Content adapter ready"
        );

        Ok(Self {
            config,
            adapter,
            render,
        })
    }

    /// Locale for per-locale content.
    pub(crate) fn locale(&self) -> Locale {
        self.config.site.locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("mz.toml");
        std::fs::write(
            &config_path,
            "[site]\nhostname = \"maklerzentrum.ch\"\n\n[cms]\nmode = \"live\"\n",
        )
        .unwrap();

        let cli = TestCli::parse_from([
            "mz",
            "--config",
            config_path.to_str().unwrap(),
            "--mode",
            "mock",
            "--no-cache",
        ]);
        let config = cli.global.load_config(Some(Locale::FrCh)).unwrap();

        assert_eq!(config.cms.mode, CmsMode::Mock);
        assert!(config.is_mock_mode());
        assert!(!config.cache.enabled);
        assert_eq!(config.site.locale, Locale::FrCh);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = TestCli::parse_from(["mz", "--config", "/nonexistent/mz.toml"]);
        assert!(matches!(
            cli.global.load_config(None),
            Err(CliError::Config(_))
        ));
    }
}

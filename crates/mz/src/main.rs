//! MZ CLI - Maklerzentrum content core.
//!
//! Provides commands for:
//! - `site`, `navigation`, `faq`, `modules`: print resolved content as JSON
//! - `refresh`: bypass the cache and reload site settings
//! - `render`: render content to HTML, standalone or into a page shell
//! - `sanitize`: sanitize an HTML file or stdin
//! - `consent`: inspect and change the stored cookie consent

mod commands;
mod context;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConsentCommand, ContentArgs, RenderArgs, SanitizeArgs};
use context::GlobalArgs;
use output::Output;

/// MZ - Maklerzentrum content core.
#[derive(Parser)]
#[command(name = "mz", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved site settings.
    Site(ContentArgs),
    /// Print the resolved navigation.
    Navigation(ContentArgs),
    /// Print the resolved FAQ list.
    Faq(ContentArgs),
    /// Print the resolved training modules.
    Modules(ContentArgs),
    /// Clear the cache and fetch site settings again.
    Refresh(ContentArgs),
    /// Render content to HTML.
    Render(RenderArgs),
    /// Sanitize HTML from a file or stdin.
    Sanitize(SanitizeArgs),
    /// Cookie consent commands.
    #[command(subcommand)]
    Consent(ConsentCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Site(args) => args.execute_site(&cli.global),
        Commands::Navigation(args) => args.execute_navigation(&cli.global),
        Commands::Faq(args) => args.execute_faq(&cli.global),
        Commands::Modules(args) => args.execute_modules(&cli.global),
        Commands::Refresh(args) => args.execute_refresh(&cli.global),
        Commands::Render(args) => args.execute(&cli.global),
        Commands::Sanitize(args) => args.execute(),
        Commands::Consent(cmd) => cmd.execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

//! Folio CLI - multi-language content core.
//!
//! Provides commands for:
//! - `resolve`: Route a request path and print the resolved page
//! - `urls`: Print a page's slug, URI and URL in every language
//! - `inventory`: Print the classified contents of a page directory

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InventoryArgs, ResolveArgs, SiteArgs, UrlsArgs};
use output::Output;

/// Folio - multi-language content core.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(flatten)]
    site: SiteArgs,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a request path and print the page it resolves to.
    Resolve(ResolveArgs),
    /// Print slug, URI and URL of a page for every language.
    Urls(UrlsArgs),
    /// Print the inventory of a page directory.
    Inventory(InventoryArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(&cli.site, &output),
        Commands::Urls(args) => args.execute(&cli.site, &output),
        Commands::Inventory(args) => args.execute(&cli.site, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

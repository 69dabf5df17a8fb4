//! Healthy Solutions Report CLI: static site builder for a pre-generated
//! health article corpus.
//!
//! Renders articles with contextual internal links, related-article widgets
//! and ad slots, and writes the site, sitemap and build summary to disk.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}

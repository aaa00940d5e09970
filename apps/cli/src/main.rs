//! notipress CLI — multi-tenant blog digest builder.
//!
//! Resolves a request host against the configured sites, pulls the site's
//! published posts from the content store, and prints the page digest as
//! JSON for the rendering layer.

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

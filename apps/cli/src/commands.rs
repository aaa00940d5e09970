//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use notipress_core::build_digest;
use notipress_notion::NotionClient;
use notipress_shared::config::SiteRegistry;
use notipress_shared::{AppConfig, config_file_path, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// notipress — multi-tenant blog digests from a Notion database.
#[derive(Parser)]
#[command(
    name = "notipress",
    version,
    about = "Build page digests for configured sites from published Notion records.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the config file (defaults to ~/.notipress/notipress.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the page digest for a request host and print it as JSON.
    Digest {
        /// Request host to resolve (e.g. "blog.example.com").
        #[arg(long)]
        host: String,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// List the configured sites in registry order.
    Sites,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Tracing targets covered by the verbosity flags: the binary itself plus
/// every workspace library crate.
const LOG_TARGETS: [&str; 4] = [
    "notipress",
    "notipress_shared",
    "notipress_notion",
    "notipress_core",
];

/// Build the default filter directives for the given verbosity level.
fn default_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    LOG_TARGETS
        .map(|target| format!("{target}={level}"))
        .join(",")
}

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Digest { host, pretty } => cmd_digest(config_path.as_deref(), &host, pretty).await,
        Command::Sites => cmd_sites(config_path.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_digest(config_path: Option<&std::path::Path>, host: &str, pretty: bool) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = SiteRegistry::try_from(&config)?;
    let client = NotionClient::new(&config.notion)?;

    let digest = build_digest(host, &registry, &client, &config.assets_dir).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&digest)?
    } else {
        serde_json::to_string(&digest)?
    };
    println!("{json}");

    Ok(())
}

fn cmd_sites(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = SiteRegistry::try_from(&config)?;

    for site in registry.sites() {
        let marker = if site.default { " (default)" } else { "" };
        println!("{}{marker}", site.host);
        println!("  title:    {}", site.title);
        println!("  database: {}", site.database_id);
        if let Some(css) = &site.custom_css {
            println!("  css:      {css}");
        }
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    info!(path = %path.display(), "config initialized");
    println!("Created {}", path.display());
    println!("Fill in the store token and at least one [[sites]] entry before serving.");
    Ok(())
}

fn cmd_config_show(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let rendered = toml::to_string_pretty(&config)?;

    match config_path {
        Some(p) => println!("# {}", p.display()),
        None => println!("# {}", config_file_path()?.display()),
    }
    println!("{rendered}");

    Ok(())
}

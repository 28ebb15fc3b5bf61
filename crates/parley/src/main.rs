//! Parley - talking-avatar session broker CLI
//!
//! Main entry point for the Parley CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, avatars, config, session, token};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Parley - talking-avatar session broker
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend URL (default: from config, else http://localhost:8000)
    #[arg(long, global = true, env = "PARLEY_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request an avatar API token
    Token(token::TokenArgs),

    /// List talking avatars
    Avatars(avatars::AvatarsArgs),

    /// Create or close avatar sessions
    Session(session::SessionArgs),

    /// Manage stored bearer tokens
    Auth(auth::AuthArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "parley=debug,parley_broker=debug,parley_client=debug,parley_cache=debug,warn"
    } else {
        "parley=info,parley_broker=warn,parley_client=warn,warn"
    };

    let log_dir = parley_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "parley.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "parley=trace,parley_broker=trace,parley_client=trace,parley_cache=trace,info",
                )),
        )
        .init();

    // Config commands must work while the config is invalid, to repair it
    let loaded = match cli.command {
        Commands::Config(_) => parley_config::load_config_lenient(None),
        _ => parley_config::load_config(None)?,
    };
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let server_url = cli
        .server
        .unwrap_or_else(|| loaded.config.server().url);

    let ctx = commands::Context {
        server_url,
        json_output: cli.json,
        verbose: cli.verbose,
        config: loaded,
    };

    match cli.command {
        Commands::Token(args) => token::run(args, &ctx).await,
        Commands::Avatars(args) => avatars::run(args, &ctx).await,
        Commands::Session(args) => session::run(args, &ctx).await,
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

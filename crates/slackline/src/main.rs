//! slackline - offline-first workspace directory
//!
//! Main entry point for the slackline CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{channels, config, refresh, users, whoami};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// slackline - mirror a chat workspace's users and conversations locally
#[derive(Parser)]
#[command(name = "slackline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the authenticated identity and enumeration protocol
    Whoami(whoami::WhoamiArgs),

    /// Load snapshots or fetch the directory, then write snapshots
    Refresh(refresh::RefreshArgs),

    /// Query the user directory
    Users(users::UsersArgs),

    /// Query the conversation directory
    Channels(channels::ChannelsArgs),

    /// Show resolved configuration and credential sources
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (stderr, human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "slackline=debug,slackline_directory=debug,slackline_client=debug,slackline_config=debug,info"
    } else {
        "slackline=info,slackline_directory=info,warn"
    };

    let log_dir = slackline_directory::default_cache_dir().join("logs");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "slackline.log");
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
                    "slackline=trace,slackline_directory=trace,slackline_client=debug,slackline_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context::load(cli.json, cli.verbose)?;

    match cli.command {
        Commands::Whoami(args) => whoami::run(args, &ctx).await,
        Commands::Refresh(args) => refresh::run(args, &ctx).await,
        Commands::Users(args) => users::run(args, &ctx).await,
        Commands::Channels(args) => channels::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

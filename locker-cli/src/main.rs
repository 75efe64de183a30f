// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Locker CLI - render a game account's cosmetics as grid images.
//!
//! # Examples
//!
//! ```bash
//! # Log in with a device code and render the Skins group
//! locker check
//!
//! # Render several groups
//! locker check --group skins --group "all cosmetics"
//!
//! # Render from an id list without logging in
//! locker render --group emotes --ids emotes.txt
//!
//! # Warm the artwork cache
//! locker prefetch --ids all_ids.txt
//!
//! # Classify ids offline
//! locker classify cid_028_athena_commando_f eid_floss
//!
//! # Configuration
//! locker config --show
//! ```

mod commands;
mod output;
mod runtime;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, classify, config, prefetch, render};

// ============================================================================
// CLI Definition
// ============================================================================

/// Locker CLI - cosmetic locker images.
#[derive(Parser)]
#[command(name = "locker")]
#[command(about = "Render a game account's cosmetics as grid images")]
#[command(long_about = r#"
Locker logs into a game account with a device code, reads the owned
cosmetics, and renders them as grid images grouped by category and
sorted by rarity.

Groups:
  Skins, Back Blings, Pickaxes, Emotes, Gliders, Banners,
  Wraps, Sprays, Others, All Cosmetics

Credentials are read from LOCKER_SWITCH_TOKEN and LOCKER_IOS_TOKEN.
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in, summarize the account and render groups.
    Check(check::CheckArgs),

    /// Render one group from an id list file.
    #[command(visible_alias = "r")]
    Render(render::RenderArgs),

    /// Download artwork for an id list into the cache.
    Prefetch(prefetch::PrefetchArgs),

    /// Print category and display order for ids (no network).
    #[command(visible_alias = "c")]
    Classify(classify::ClassifyArgs),

    /// Show or initialize configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Login failed or timed out.
    AuthFailed = 2,
    /// Invalid configuration.
    ConfigError = 3,
}

impl ExitCode {
    fn for_error(error: &anyhow::Error) -> Self {
        if error.downcast_ref::<locker_fetch::AuthError>().is_some() {
            Self::AuthFailed
        } else if matches!(
            error.downcast_ref::<locker_store::StoreError>(),
            Some(locker_store::StoreError::Config(_) | locker_store::StoreError::Serialization(_))
        ) {
            Self::ConfigError
        } else {
            Self::Error
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("locker=debug,info")
    } else {
        EnvFilter::new("locker=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Check(args) => check::run(args, &cli).await,
        Commands::Render(args) => render::run(args, &cli).await,
        Commands::Prefetch(args) => prefetch::run(args, &cli).await,
        Commands::Classify(args) => classify::run(args, &cli),
        Commands::Config(args) => config::run(args, &cli),
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::for_error(&e)
        }
    };
    std::process::exit(code as i32);
}

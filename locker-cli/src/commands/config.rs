//! Config command - show or initialize configuration.

use anyhow::Result;
use clap::Args;
use locker_store::{Config, default_cache_dir, default_config_dir};
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::runtime::load_config;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    /// Show the effective configuration (default).
    #[arg(long, conflicts_with_all = ["init", "path"])]
    pub show: bool,

    /// Write the default configuration file.
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init.
    #[arg(long, requires = "init")]
    pub force: bool,

    /// Show configuration paths.
    #[arg(long, conflicts_with = "init")]
    pub path: bool,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    if args.init {
        init_config(args.force, cli)
    } else if args.path {
        show_paths(cli)
    } else {
        show_config(cli)
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_config(&config));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&config)?);
        }
    }
    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_file = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.format {
        OutputFormat::Text => {
            println!("Config dir:  {}", default_config_dir().display());
            println!("Config file: {}", config_file.display());
            println!("Cache dir:   {}", default_cache_dir().display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": default_config_dir().display().to_string(),
                "config_file": config_file.display().to_string(),
                "cache_dir": default_cache_dir().display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }
    Ok(())
}

fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    info!(path = %path.display(), "Configuration initialized");
    if !cli.quiet {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

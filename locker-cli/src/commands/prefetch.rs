//! Prefetch command - warm the artwork cache.

use anyhow::Result;
use clap::Args;
use locker_core::ItemId;
use std::path::PathBuf;
use tracing::info;

use crate::output::{JsonFormatter, PrefetchOutput, TextFormatter};
use crate::runtime::{Services, http_client, load_config, read_id_file};
use crate::{Cli, OutputFormat};

/// Arguments for the prefetch command.
#[derive(Args)]
pub struct PrefetchArgs {
    /// File with one item id per line.
    #[arg(long)]
    pub ids: PathBuf,
}

/// Runs the prefetch command.
pub async fn run(args: &PrefetchArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ids: Vec<ItemId> = read_id_file(&args.ids)?;
    info!(ids = ids.len(), "Prefetching artwork");

    let http = http_client(&config)?;
    let services = Services::build(&config, &http)?;
    let report = services.pipeline.assets().ensure_all(&ids).await?;
    let output = PrefetchOutput::from(&report);

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_prefetch(&output));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

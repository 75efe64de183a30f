//! Render command - one group from an id list, no login.

use anyhow::Result;
use clap::Args;
use locker_core::Group;
use locker_fetch::BannerNameMap;
use std::path::PathBuf;

use crate::output::{JsonFormatter, TextFormatter};
use crate::runtime::{Services, http_client, load_config, read_id_file};
use crate::{Cli, OutputFormat};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Group label, e.g. "Skins" or "All Cosmetics".
    #[arg(long, short, default_value = "All Cosmetics")]
    pub group: String,

    /// File with one item id per line.
    #[arg(long)]
    pub ids: PathBuf,

    /// Name shown in the footer.
    #[arg(long, default_value = "locker")]
    pub username: String,
}

/// Runs the render command.
pub async fn run(args: &RenderArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let group = Group::parse(&args.group)?;
    let ids = read_id_file(&args.ids)?;

    let http = http_client(&config)?;
    let services = Services::build(&config, &http)?;

    // Offline renders have no account, so banners keep their generic names.
    let banners = BannerNameMap::new();
    let image = services
        .pipeline
        .build_group_image(group.label(), &ids, &args.username, &banners)
        .await?;

    let (images, empty) = match image {
        Some(image) => (vec![image], Vec::new()),
        None => (Vec::new(), vec![group.label().to_string()]),
    };

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_images(&images, &empty));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&images)?);
        }
    }
    Ok(())
}

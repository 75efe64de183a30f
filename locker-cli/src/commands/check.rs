//! Check command - log in, summarize the account and render groups.

use anyhow::Result;
use clap::Args;
use locker_core::{Category, Group};
use locker_fetch::account::{bucket_counts, parse_banner_ids};
use locker_fetch::{
    BannerDiscovery, BannerNameMap, ClientCredentials, DeviceAuthFlow, ProfileClient, ProfileId,
};
use locker_render::GroupImage;
use locker_store::{SessionStore, UserSession};
use tracing::{info, warn};

use crate::output::{CheckOutput, JsonFormatter, TextFormatter};
use crate::runtime::{Services, http_client, load_config};
use crate::{Cli, OutputFormat};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Groups to render (repeatable). Defaults to the configured groups.
    #[arg(long, short)]
    pub group: Vec<String>,

    /// Only print the account summary.
    #[arg(long)]
    pub no_render: bool,

    /// Delete the rendered images once printed.
    #[arg(long)]
    pub cleanup: bool,
}

/// Runs the check command.
pub async fn run(args: &CheckArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let labels = if args.group.is_empty() {
        config.default_groups.clone()
    } else {
        args.group.clone()
    };
    let groups = labels
        .iter()
        .map(|label| Group::parse(label))
        .collect::<Result<Vec<_>, _>>()?;

    // Credentials are checked before any request goes out.
    let credentials = ClientCredentials::from_env()?;
    let http = http_client(&config)?;

    let flow = DeviceAuthFlow::new(http.clone(), credentials);
    let quiet = cli.quiet;
    let session = flow
        .run_with_callback(|start| {
            if !quiet {
                eprintln!("Open this link to log in: {}", start.verification_uri_complete);
            }
        })
        .await?;
    let username = session.display_name.clone();
    info!(account = %username, "Logged in");

    let profiles = ProfileClient::new(http.clone(), session);
    let (summary, inventory, common_core) = tokio::join!(
        profiles.summary(),
        profiles.inventory(),
        profiles.query_profile(ProfileId::CommonCore),
    );
    let summary = summary?;
    let mut inventory = inventory?;

    let services = Services::build(&config, &http)?;
    let mut banners = BannerNameMap::new();
    match common_core {
        Ok(profile) => {
            let owned = parse_banner_ids(&profile);
            let discovered = BannerDiscovery::new(services.catalog.as_ref(), services.pipeline.assets())
                .discover(&owned, &mut banners)
                .await;
            inventory.extend(Category::Banners, discovered);
        }
        Err(e) => warn!(error = %e, "Banners unavailable"),
    }
    let counts = bucket_counts(&inventory);

    let sessions = SessionStore::new();
    sessions
        .start(&username, UserSession::new(username.clone(), inventory, banners))
        .await;

    let mut images: Vec<GroupImage> = Vec::new();
    let mut empty_groups = Vec::new();
    if !args.no_render {
        for group in groups {
            // Repeated --group flags reuse the first image.
            if sessions.cached_image(&username, group.label()).await.is_some() {
                continue;
            }
            let Some(user) = sessions.get(&username).await else {
                break;
            };
            match services
                .pipeline
                .build_for_inventory(group, &user.items, &username, &user.banners)
                .await?
            {
                Some(image) => {
                    sessions
                        .remember(&username, group.label(), image.path.clone())
                        .await?;
                    images.push(image);
                }
                None => empty_groups.push(group.label().to_string()),
            }
        }
        if !images.is_empty() {
            sessions
                .save_manifest(&username, &config.output_dir.join("manifest.json"))
                .await?;
        }
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_summary(&summary, &counts));
            if !args.no_render {
                println!();
                println!("{}", formatter.format_images(&images, &empty_groups));
            }
        }
        OutputFormat::Json => {
            let output = CheckOutput::new(summary, &counts, images, empty_groups);
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    if args.cleanup {
        let removed = sessions.end_session(&username).await?;
        info!(removed, "Rendered images removed");
    }
    Ok(())
}

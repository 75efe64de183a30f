//! Classify command - category and display order without network access.

use anyhow::Result;
use clap::Args;
use locker_core::{CosmeticInfo, CosmeticOrder, DISPLAY_ORDER, ItemId, Rarity, classify, parse_item_ids};
use std::path::PathBuf;

use crate::output::{ClassifiedItem, JsonFormatter, TextFormatter};
use crate::runtime::read_id_file;
use crate::{Cli, OutputFormat};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Item ids to classify.
    pub ids: Vec<String>,

    /// Also read ids from a file (one per line).
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Runs the classify command.
pub fn run(args: &ClassifyArgs, cli: &Cli) -> Result<()> {
    let mut ids = parse_item_ids(&args.ids);
    if let Some(path) = &args.file {
        ids.extend(read_id_file(path)?);
    }
    if ids.is_empty() {
        anyhow::bail!("No item ids given");
    }

    let items = classify_ids(&ids);

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_classification(&items));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&items)?);
        }
    }
    Ok(())
}

/// Orders ids by category and sub-order with rarity left unresolved.
pub fn classify_ids(ids: &[ItemId]) -> Vec<ClassifiedItem> {
    let infos: Vec<CosmeticInfo> = ids
        .iter()
        .map(|id| CosmeticInfo::new(id.clone(), id.as_str(), Rarity::Common))
        .collect();
    CosmeticOrder::default()
        .order(&infos, &DISPLAY_ORDER)
        .into_iter()
        .enumerate()
        .map(|(index, id)| ClassifiedItem {
            position: index + 1,
            category: classify(id.as_str()),
            id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use locker_core::Category;

    #[test]
    fn test_classify_orders_by_category() {
        let ids = parse_item_ids(["eid_floss", "wrap_001", "cid_028_athena_commando_f", "bid_001"]);
        let items = classify_ids(&ids);
        let order: Vec<(&str, Category)> =
            items.iter().map(|i| (i.id.as_str(), i.category)).collect();
        assert_eq!(
            order,
            vec![
                ("cid_028_athena_commando_f", Category::Skins),
                ("bid_001", Category::BackBlings),
                ("eid_floss", Category::Emotes),
                ("wrap_001", Category::Wraps),
            ]
        );
        assert_eq!(items[0].position, 1);
        assert_eq!(items[3].position, 4);
    }
}

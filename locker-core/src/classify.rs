//! Identifier classification.
//!
//! Maps an item identifier to its [`Category`] by substring heuristics. Rules
//! are checked in a fixed priority order and the first match wins, so an id
//! carrying several tokens always lands in the highest-priority category.

use crate::models::{BANNER_PREFIX, Category};

/// Substring rules, checked top to bottom.
const RULES: &[(Category, &[&str])] = &[
    (Category::Skins, &["character_", "cid_"]),
    (Category::BackBlings, &["bid_", "backpack"]),
    (
        Category::Pickaxes,
        &["pickaxe_", "pickaxe_id_", "defaultpickaxe", "halloweenscythe"],
    ),
    (Category::Emotes, &["eid", "emote"]),
    (
        Category::Gliders,
        &["glider", "founderumbrella", "founderglider", "solo_umbrella"],
    ),
];

/// Classifies an identifier. Total and case-insensitive.
pub fn classify(id: &str) -> Category {
    let id = id.to_lowercase();

    for (category, tokens) in RULES {
        if tokens.iter().any(|token| id.contains(token)) {
            return *category;
        }
    }

    if id.starts_with(BANNER_PREFIX) {
        Category::Banners
    } else if id.contains("wrap") {
        Category::Wraps
    } else if id.contains("spray") {
        Category::Sprays
    } else {
        Category::Others
    }
}

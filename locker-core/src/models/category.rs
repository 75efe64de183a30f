//! Item categories and render groups.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Label of the group that concatenates every category.
pub const ALL_COSMETICS: &str = "All Cosmetics";

/// Coarse item type derived from the identifier's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Outfits.
    #[serde(rename = "Skins")]
    Skins,
    /// Back accessories.
    #[serde(rename = "Back Blings")]
    BackBlings,
    /// Harvesting tools.
    #[serde(rename = "Pickaxes")]
    Pickaxes,
    /// Dances and emotes.
    #[serde(rename = "Emotes")]
    Emotes,
    /// Gliders and umbrellas.
    #[serde(rename = "Gliders")]
    Gliders,
    /// Profile banners.
    #[serde(rename = "Banners")]
    Banners,
    /// Weapon wraps.
    #[serde(rename = "Wraps")]
    Wraps,
    /// Sprays.
    #[serde(rename = "Sprays")]
    Sprays,
    /// Anything else.
    #[serde(rename = "Others")]
    Others,
}

/// Category order used for every rendered group.
pub const DISPLAY_ORDER: [Category; 6] = [
    Category::Skins,
    Category::BackBlings,
    Category::Pickaxes,
    Category::Emotes,
    Category::Gliders,
    Category::Banners,
];

impl Category {
    /// Returns all categories.
    pub fn all() -> &'static [Category] {
        &[
            Self::Skins,
            Self::BackBlings,
            Self::Pickaxes,
            Self::Emotes,
            Self::Gliders,
            Self::Banners,
            Self::Wraps,
            Self::Sprays,
            Self::Others,
        ]
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skins => "Skins",
            Self::BackBlings => "Back Blings",
            Self::Pickaxes => "Pickaxes",
            Self::Emotes => "Emotes",
            Self::Gliders => "Gliders",
            Self::Banners => "Banners",
            Self::Wraps => "Wraps",
            Self::Sprays => "Sprays",
            Self::Others => "Others",
        }
    }

    /// Looks up a category by label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Group
// ============================================================================

/// A named render request: one category, or every display category at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// A single category bucket.
    Category(Category),
    /// Every category of [`DISPLAY_ORDER`], concatenated in that order.
    AllCosmetics,
}

impl Group {
    /// Parses a group label such as `"Skins"` or `"All Cosmetics"`.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        if label.trim().eq_ignore_ascii_case(ALL_COSMETICS) {
            return Ok(Self::AllCosmetics);
        }
        Category::from_label(label)
            .map(Self::Category)
            .ok_or_else(|| CoreError::UnknownGroup(label.to_string()))
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category(category) => category.label(),
            Self::AllCosmetics => ALL_COSMETICS,
        }
    }

    /// Filesystem-safe stem for this group's output image.
    pub fn file_stem(&self) -> String {
        group_file_stem(self.label())
    }

    /// Categories whose buckets make up this group, in concatenation order.
    pub fn categories(&self) -> Vec<Category> {
        match self {
            Self::Category(category) => vec![*category],
            Self::AllCosmetics => DISPLAY_ORDER.to_vec(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercases a label and replaces spaces with underscores.
pub fn group_file_stem(label: &str) -> String {
    label.trim().replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_parse() {
        assert_eq!(Group::parse("skins").unwrap(), Group::Category(Category::Skins));
        assert_eq!(
            Group::parse("Back Blings").unwrap(),
            Group::Category(Category::BackBlings)
        );
        assert_eq!(Group::parse("all cosmetics").unwrap(), Group::AllCosmetics);
        assert!(matches!(Group::parse("hats"), Err(CoreError::UnknownGroup(_))));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(Group::AllCosmetics.file_stem(), "all_cosmetics");
        assert_eq!(Group::Category(Category::BackBlings).file_stem(), "back_blings");
    }

    #[test]
    fn test_all_cosmetics_categories() {
        assert_eq!(Group::AllCosmetics.categories(), DISPLAY_ORDER.to_vec());
        assert_eq!(
            Group::Category(Category::Emotes).categories(),
            vec![Category::Emotes]
        );
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Category::BackBlings).unwrap();
        assert_eq!(json, r#""Back Blings""#);
    }
}

//! Rarity tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rarity tier as reported by the cosmetic catalog.
///
/// The sixteen known tiers each own a background tile and a sort rank.
/// Anything else the catalog sends is carried verbatim in [`Rarity::Other`]
/// and sorts after every known tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    /// Common
    #[default]
    Common,
    /// Uncommon
    Uncommon,
    /// Rare
    Rare,
    /// Epic
    Epic,
    /// Legendary
    Legendary,
    /// Mythic
    Mythic,
    /// Icon Series
    IconSeries,
    /// DARK SERIES
    DarkSeries,
    /// Star Wars Series
    StarWarsSeries,
    /// MARVEL SERIES
    MarvelSeries,
    /// DC SERIES
    DcSeries,
    /// Gaming Legends Series
    GamingLegendsSeries,
    /// Shadow Series
    ShadowSeries,
    /// Slurp Series
    SlurpSeries,
    /// Lava Series
    LavaSeries,
    /// Frozen Series
    FrozenSeries,
    /// A tier outside the known set.
    Other(String),
}

impl Rarity {
    /// Returns all known tiers.
    pub fn all() -> &'static [Rarity] {
        &[
            Self::Common,
            Self::Uncommon,
            Self::Rare,
            Self::Epic,
            Self::Legendary,
            Self::Mythic,
            Self::IconSeries,
            Self::DarkSeries,
            Self::StarWarsSeries,
            Self::MarvelSeries,
            Self::DcSeries,
            Self::GamingLegendsSeries,
            Self::ShadowSeries,
            Self::SlurpSeries,
            Self::LavaSeries,
            Self::FrozenSeries,
        ]
    }

    /// Returns the catalog's display value for this tier.
    pub fn display_value(&self) -> &str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
            Self::IconSeries => "Icon Series",
            Self::DarkSeries => "DARK SERIES",
            Self::StarWarsSeries => "Star Wars Series",
            Self::MarvelSeries => "MARVEL SERIES",
            Self::DcSeries => "DC SERIES",
            Self::GamingLegendsSeries => "Gaming Legends Series",
            Self::ShadowSeries => "Shadow Series",
            Self::SlurpSeries => "Slurp Series",
            Self::LavaSeries => "Lava Series",
            Self::FrozenSeries => "Frozen Series",
            Self::Other(value) => value,
        }
    }

    /// Parses a catalog display value, case-insensitively.
    pub fn from_display_value(value: &str) -> Self {
        let trimmed = value.trim();
        Self::all()
            .iter()
            .find(|r| r.display_value().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Self::Other(trimmed.to_string()))
    }

    /// Returns true for tiers outside the known set.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Collaboration series. Their names run long, so labels get a larger font budget.
    pub fn is_special_series(&self) -> bool {
        matches!(
            self,
            Self::IconSeries
                | Self::DarkSeries
                | Self::StarWarsSeries
                | Self::MarvelSeries
                | Self::DcSeries
                | Self::GamingLegendsSeries
                | Self::ShadowSeries
                | Self::SlurpSeries
                | Self::LavaSeries
                | Self::FrozenSeries
        )
    }

    /// File name of the background tile for this tier.
    ///
    /// Unknown tiers use the Common background.
    pub fn background_file(&self) -> &'static str {
        match self {
            Self::Common | Self::Other(_) => "common.png",
            Self::Uncommon => "uncommon.png",
            Self::Rare => "rare.png",
            Self::Epic => "epic.png",
            Self::Legendary => "legendary.png",
            Self::Mythic => "mythic.png",
            Self::IconSeries => "icon.png",
            Self::DarkSeries => "dark.png",
            Self::StarWarsSeries => "starwars.png",
            Self::MarvelSeries => "marvel.png",
            Self::DcSeries => "dc.png",
            Self::GamingLegendsSeries => "gaming_legends.png",
            Self::ShadowSeries => "shadow.png",
            Self::SlurpSeries => "slurp.png",
            Self::LavaSeries => "lava.png",
            Self::FrozenSeries => "frozen.png",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_value())
    }
}

impl From<String> for Rarity {
    fn from(value: String) -> Self {
        Self::from_display_value(&value)
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        rarity.display_value().to_string()
    }
}

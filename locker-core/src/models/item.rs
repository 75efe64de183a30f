//! Item identifiers and resolved cosmetic records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rarity::Rarity;
use crate::error::CoreError;

/// Prefix shared by every banner identifier.
pub const BANNER_PREFIX: &str = "banner_";

/// Display name the catalog uses for records it cannot name.
pub const UNKNOWN_NAME: &str = "Unknown";

// ============================================================================
// Item Identifier
// ============================================================================

/// Opaque lowercase token naming one inventory item (`cid_…`, `eid_…`, `banner_…`).
///
/// The token encodes provenance only by convention; nothing guarantees that
/// two identifiers from different categories differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Creates an identifier, trimming and lowercasing the raw token.
    ///
    /// Only `[a-z0-9_.-]` is accepted, and `..` never, since the id doubles
    /// as a file name in the artwork cache.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        validate(&normalized)?;
        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for profile banners, which resolve through a separate path.
    pub fn is_banner(&self) -> bool {
        self.0.starts_with(BANNER_PREFIX)
    }

    /// Builds the identifier for a banner given its catalog id.
    pub fn for_banner(banner_id: &str) -> Result<Self, CoreError> {
        let banner_id = banner_id.trim().to_lowercase();
        validate(&banner_id)?;
        if banner_id.starts_with(BANNER_PREFIX) {
            return Ok(Self(banner_id));
        }
        Ok(Self(format!("{BANNER_PREFIX}{banner_id}")))
    }

    /// File name of this item's cached artwork.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.0)
    }
}

fn validate(token: &str) -> Result<(), CoreError> {
    if token.is_empty() {
        return Err(CoreError::EmptyItemId);
    }
    let allowed = token
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'.' | b'-'));
    if !allowed || token.contains("..") {
        return Err(CoreError::InvalidItemId(token.to_string()));
    }
    Ok(())
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Parses a list of raw tokens, skipping blanks.
pub fn parse_item_ids<I, S>(raw: I) -> Vec<ItemId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().filter_map(|s| ItemId::new(s).ok()).collect()
}

// ============================================================================
// Cosmetic Info
// ============================================================================

/// Display metadata resolved for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticInfo {
    /// The item this record describes.
    pub id: ItemId,
    /// Display name shown on the tile.
    pub name: String,
    /// Rarity tier driving the background and sort rank.
    pub rarity: Rarity,
}

impl CosmeticInfo {
    /// Creates a new record.
    pub fn new(id: ItemId, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id,
            name: name.into(),
            rarity,
        }
    }

    /// Record produced when the catalog has nothing for this item.
    pub fn unknown(id: ItemId) -> Self {
        Self::new(id, UNKNOWN_NAME, Rarity::Common)
    }

    /// True when the name is the "unknown" sentinel; such items are never rendered.
    pub fn is_unknown(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(UNKNOWN_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_normalizes() {
        let id = ItemId::new("  CID_017_Athena_Commando_M \n").unwrap();
        assert_eq!(id.as_str(), "cid_017_athena_commando_m");
        assert_eq!(id.file_name(), "cid_017_athena_commando_m.png");
    }

    #[test]
    fn test_item_id_rejects_blank() {
        assert!(matches!(ItemId::new("   "), Err(CoreError::EmptyItemId)));
    }

    #[test]
    fn test_item_id_rejects_path_tokens() {
        for raw in ["cid_x/../../escaped", "..", "cid..x", "a\\b", "cid_bad\0x", "eid floss", "/etc/passwd"] {
            assert!(
                matches!(ItemId::new(raw), Err(CoreError::InvalidItemId(_))),
                "accepted {raw:?}"
            );
        }
        assert!(matches!(ItemId::for_banner("../x"), Err(CoreError::InvalidItemId(_))));
        assert!(ItemId::new("wrap_001.v2-alt").is_ok());
        assert_eq!(parse_item_ids(["cid_ok", "cid/../x", ""]).len(), 1);
    }

    #[test]
    fn test_banner_ids() {
        let a = ItemId::for_banner("OT1Banner").unwrap();
        let b = ItemId::for_banner("banner_ot1banner").unwrap();
        assert_eq!(a, b);
        assert!(a.is_banner());
        assert!(!ItemId::new("eid_floss").unwrap().is_banner());
    }

    #[test]
    fn test_unknown_sentinel() {
        let id = ItemId::new("cid_x").unwrap();
        assert!(CosmeticInfo::unknown(id.clone()).is_unknown());
        assert!(CosmeticInfo::new(id.clone(), "  UNKNOWN ", Rarity::Rare).is_unknown());
        assert!(!CosmeticInfo::new(id, "Renegade Raider", Rarity::Rare).is_unknown());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let id: ItemId = serde_json::from_str(r#""EID_Floss""#).unwrap();
        assert_eq!(id.as_str(), "eid_floss");
        assert!(serde_json::from_str::<ItemId>(r#""""#).is_err());
    }
}

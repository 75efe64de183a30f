//! JSON output formatting.

use anyhow::Result;
use locker_core::{Category, ItemId};
use locker_fetch::{AccountSummary, AssetReport, AssetStatus};
use locker_render::GroupImage;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Result of `locker check`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub account: AccountSummary,
    pub items: Vec<CategoryCount>,
    pub images: Vec<GroupImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub empty_groups: Vec<String>,
}

/// Item count of one category.
#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

impl CheckOutput {
    /// Pairs the summary with bucket counts and rendered images.
    pub fn new(
        account: AccountSummary,
        counts: &[(Category, usize)],
        images: Vec<GroupImage>,
        empty_groups: Vec<String>,
    ) -> Self {
        Self {
            account,
            items: counts
                .iter()
                .map(|(category, count)| CategoryCount {
                    category: *category,
                    count: *count,
                })
                .collect(),
            images,
            empty_groups,
        }
    }
}

/// One classified id, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedItem {
    pub position: usize,
    pub id: ItemId,
    pub category: Category,
}

/// Result of `locker prefetch`.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefetchOutput {
    pub total: usize,
    pub cached: usize,
    pub downloaded: usize,
    pub placeholder: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl From<&AssetReport> for PrefetchOutput {
    fn from(report: &AssetReport) -> Self {
        Self {
            total: report.len(),
            cached: report.count(AssetStatus::Cached),
            downloaded: report.count(AssetStatus::Downloaded),
            placeholder: report.count(AssetStatus::Placeholder),
            skipped: report.count(AssetStatus::Skipped),
            failed: report.count(AssetStatus::Failed),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

//! Text output formatting with colors.

use locker_core::Category;
use locker_fetch::AccountSummary;
use locker_render::GroupImage;
use locker_store::Config;

use super::json::{ClassifiedItem, PrefetchOutput};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const RULE_WIDTH: usize = 40;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the account overview and per-category counts.
    pub fn format_summary(&self, summary: &AccountSummary, counts: &[(Category, usize)]) -> String {
        let mut lines = vec![
            self.bold(&format!("Account: {}", summary.display_name)),
            "─".repeat(RULE_WIDTH),
            format!("Account ID:       {}", summary.account_id),
            format!("Email:            {}", summary.email),
            format!("Email verified:   {}", yes_no(summary.email_verified)),
            format!("2FA:              {}", yes_no(summary.tfa_enabled)),
            format!("Parental control: {}", yes_no(summary.parental_control)),
            format!("Name:             {}", summary.name),
            format!("Country:          {}", summary.country),
            format!("Created:          {}", summary.creation_date),
            format!("V-Bucks:          {}", self.cyan(&summary.vbucks.to_string())),
            format!("PlayStation:      {}", summary.playstation),
            format!("Xbox:             {}", summary.xbox),
            format!("Level:            {}", summary.stats.account_level),
            format!(
                "Wins:             {} / {} matches",
                summary.stats.total_wins, summary.stats.total_matches
            ),
            format!("Last match:       {}", summary.stats.last_match),
        ];

        if !counts.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("Cosmetics"));
            for (category, count) in counts {
                lines.push(format!("  {:<12} {count}", category.label()));
            }
        }

        lines.join("\n")
    }

    /// Formats produced images, noting placeholders and dropped items.
    pub fn format_images(&self, images: &[GroupImage], empty_groups: &[String]) -> String {
        let mut lines = Vec::new();
        for image in images {
            lines.push(format!(
                "{} {:<14} {} {}",
                self.green("✓"),
                image.group,
                image.path.display(),
                self.dim(&format!("({} items)", image.item_count))
            ));
            if !image.placeholders.is_empty() {
                lines.push(format!(
                    "  {}",
                    self.yellow(&format!("{} drawn with placeholder art", image.placeholders.len()))
                ));
            }
            if !image.dropped.is_empty() {
                lines.push(format!(
                    "  {}",
                    self.yellow(&format!("{} left out (unknown to the catalog)", image.dropped.len()))
                ));
            }
        }
        for group in empty_groups {
            lines.push(format!("{} {group:<14} {}", self.dim("-"), self.dim("nothing to render")));
        }
        lines.join("\n")
    }

    /// Formats classified ids in display order.
    pub fn format_classification(&self, items: &[ClassifiedItem]) -> String {
        items
            .iter()
            .map(|item| format!("{:>3}. {:<12} {}", item.position, item.category.label(), item.id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats a prefetch report.
    pub fn format_prefetch(&self, report: &PrefetchOutput) -> String {
        let mut line = format!(
            "{} items: {} cached, {} downloaded, {} placeholder, {} skipped",
            report.total, report.cached, report.downloaded, report.placeholder, report.skipped
        );
        if report.failed > 0 {
            line.push_str(&format!(", {}", self.yellow(&format!("{} failed", report.failed))));
        }
        line
    }

    /// Formats the configuration.
    pub fn format_config(&self, config: &Config) -> String {
        let lines = [
            self.bold("Locker Configuration"),
            "─".repeat(RULE_WIDTH),
            format!("Cache dir:      {}", config.cache_dir.display()),
            format!("Output dir:     {}", config.output_dir.display()),
            format!("Assets dir:     {}", config.assets_dir.display()),
            format!("Catalog:        {}", config.catalog_base_url),
            format!("Watermark:      {}", config.watermark),
            format!("Tile workers:   {}", config.tile_workers),
            format!("Default groups: {}", config.default_groups.join(", ")),
        ];
        lines.join("\n")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

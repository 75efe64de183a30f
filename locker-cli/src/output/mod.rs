//! Output formatting for CLI.

mod json;
mod text;

pub use json::{CheckOutput, ClassifiedItem, JsonFormatter, PrefetchOutput};
pub use text::TextFormatter;

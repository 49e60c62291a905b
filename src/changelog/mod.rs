pub mod categorizer;
pub mod parser;

pub use categorizer::{ItemKind, classify};
pub use parser::{ChangelogItem, LatestSection, ParsedVersion, parse_all, parse_latest_only};

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::categorizer::{ItemKind, classify};

lazy_static! {
    /// A version header: one or two `#`, whitespace, then a strict
    /// MAJOR.MINOR.PATCH token with an optional pre-release tag,
    /// optionally wrapped in brackets. Three-or-more `#` never match.
    static ref VERSION_HEADER_RE: Regex = Regex::new(
        r"^#{1,2}\s+\[?(\d+\.\d+\.\d+(?:-[A-Za-z0-9.]+)?)\]?(?:$|[\s(:\[])"
    )
    .unwrap();
    /// A `(YYYY-MM-DD)` date closing out the header line.
    static ref PAREN_DATE_RE: Regex = Regex::new(r"\((\d{4}-\d{2}-\d{2})\)\s*$").unwrap();
    /// A date following a hyphen or en-dash: `- 2024-01-12` or `- January 12, 2024`.
    static ref DASH_DATE_RE: Regex =
        Regex::new(r"[-–]\s*(\d{4}-\d{2}-\d{2}|[A-Za-z]+ \d{1,2}, \d{4})").unwrap();
}

/// One classified bullet from a changelog section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogItem {
    pub kind: ItemKind,
    pub content: String,
}

/// One version entry extracted from a changelog document.
///
/// Ephemeral parse output; only the derived ledger rows are persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedVersion {
    pub version: String,
    /// Best-effort release date, empty when no pattern matched.
    pub date: String,
    pub items: Vec<ChangelogItem>,
    pub source_id: Option<String>,
    pub source_name: Option<String>,
}

/// The first version section of a document, captured verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestSection {
    pub version: String,
    /// The header line through the line before the next header.
    pub raw: String,
    pub date: String,
}

fn header_version(line: &str) -> Option<&str> {
    VERSION_HEADER_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn extract_date(
    line: &str,
    version: &str,
    release_dates: Option<&HashMap<String, String>>,
) -> String {
    if let Some(c) = PAREN_DATE_RE.captures(line) {
        return c[1].to_string();
    }
    if let Some(c) = DASH_DATE_RE.captures(line) {
        return c[1].to_string();
    }
    release_dates
        .and_then(|dates| dates.get(version))
        .cloned()
        .unwrap_or_default()
}

/// Parse every version entry out of a changelog document, in document
/// order (the parser never reorders; newest-first input stays
/// newest-first).
///
/// Headers that carry no strict semver triplet ("## Unreleased") are
/// skipped, and bullets under them are dropped since no version is
/// open. Prose lines are ignored; only a bullet's own line is captured.
pub fn parse_all(
    markdown: &str,
    source_id: Option<&str>,
    source_name: Option<&str>,
    release_dates: Option<&HashMap<String, String>>,
) -> Vec<ParsedVersion> {
    let mut versions = Vec::new();
    let mut current: Option<ParsedVersion> = None;

    for line in markdown.lines() {
        if let Some(version) = header_version(line) {
            if let Some(done) = current.take() {
                versions.push(done);
            }
            current = Some(ParsedVersion {
                version: version.to_string(),
                date: extract_date(line, version, release_dates),
                items: Vec::new(),
                source_id: source_id.map(str::to_string),
                source_name: source_name.map(str::to_string),
            });
        } else if line.starts_with("- ") || line.starts_with("* ") {
            if let Some(ref mut open) = current {
                let content = line[2..].trim().to_string();
                let kind = classify(&content);
                open.items.push(ChangelogItem { kind, content });
            }
        }
    }

    if let Some(done) = current.take() {
        versions.push(done);
    }
    versions
}

/// Streaming fast path: capture only the first version's section.
///
/// Stops as soon as a second version header is seen. The raw slice is
/// returned verbatim so it can be fed to the analyzer untouched. No
/// release-date fallback here; there is no per-source lookup table
/// mid-crawl.
pub fn parse_latest_only(markdown: &str) -> Option<LatestSection> {
    let mut version: Option<String> = None;
    let mut date = String::new();
    let mut raw_lines: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        match header_version(line) {
            Some(v) if version.is_none() => {
                version = Some(v.to_string());
                date = extract_date(line, v, None);
                raw_lines.push(line);
            }
            Some(_) => break,
            None if version.is_some() => raw_lines.push(line),
            None => {}
        }
    }

    version.map(|version| LatestSection {
        version,
        raw: raw_lines.join("\n"),
        date,
    })
}

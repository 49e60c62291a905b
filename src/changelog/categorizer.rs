use serde::{Deserialize, Serialize};

/// The kind of change a single changelog bullet describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Breaking,
    Removal,
    Fix,
    Feature,
    Other,
}

/// Classify a changelog bullet by keyword matching.
///
/// The rules form a precedence chain and must stay in this order:
/// "removed support" is Breaking, never Removal, because the first
/// rule matches both words before the removal rule gets a look.
pub fn classify(text: &str) -> ItemKind {
    let lower = text.to_lowercase();

    if lower.contains("breaking") || (lower.contains("removed") && lower.contains("support")) {
        return ItemKind::Breaking;
    }
    if lower.contains("removed") || lower.contains("deprecated") || lower.contains("no longer") {
        return ItemKind::Removal;
    }
    if lower.contains("fix")
        || lower.contains("fixed")
        || lower.contains("bug")
        || lower.contains("issue")
    {
        return ItemKind::Fix;
    }
    if lower.contains("add")
        || lower.contains("new")
        || lower.contains("feature")
        || lower.contains("support")
    {
        return ItemKind::Feature;
    }
    ItemKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_support_is_breaking_not_removal() {
        assert_eq!(
            classify("removed support for legacy flag"),
            ItemKind::Breaking
        );
    }

    #[test]
    fn breaking_keyword_wins_over_everything() {
        assert_eq!(
            classify("BREAKING: fixed the new add command"),
            ItemKind::Breaking
        );
    }

    #[test]
    fn removal_keywords() {
        assert_eq!(classify("Removed the --foo option"), ItemKind::Removal);
        assert_eq!(classify("This API is deprecated"), ItemKind::Removal);
        assert_eq!(classify("The tool no longer prints color"), ItemKind::Removal);
    }

    #[test]
    fn fix_beats_feature() {
        // "fixed" and "add" both appear; the fix rule fires first.
        assert_eq!(classify("Fixed a bug in the add command"), ItemKind::Fix);
        assert_eq!(classify("Resolved an issue with paths"), ItemKind::Fix);
    }

    #[test]
    fn feature_keywords() {
        assert_eq!(classify("Added dark mode"), ItemKind::Feature);
        assert_eq!(classify("New keyboard shortcuts"), ItemKind::Feature);
        assert_eq!(classify("Support for ARM builds"), ItemKind::Feature);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("FIXED crash on startup"), ItemKind::Fix);
    }

    #[test]
    fn unmatched_text_is_other() {
        assert_eq!(classify("Updated documentation wording"), ItemKind::Other);
        assert_eq!(classify(""), ItemKind::Other);
    }
}

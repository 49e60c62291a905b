use serde::{Deserialize, Serialize};

/// Structured summary of one release section, as returned by the
/// text-analysis service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseAnalysis {
    pub tldr: String,
    #[serde(default)]
    pub categories: AnalysisCategories,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub sentiment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisCategories {
    #[serde(default)]
    pub critical_breaking_changes: Vec<String>,
    #[serde(default)]
    pub removals: Vec<RemovalNote>,
    #[serde(default)]
    pub major_features: Vec<String>,
    #[serde(default)]
    pub important_fixes: Vec<String>,
    #[serde(default)]
    pub new_slash_commands: Vec<String>,
    #[serde(default)]
    pub terminal_improvements: Vec<String>,
    #[serde(default)]
    pub api_changes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalNote {
    pub feature: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub why: String,
}

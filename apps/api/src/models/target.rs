use serde::{Deserialize, Serialize};

/// Admission-difficulty bucket a target is listed under on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TargetCategory {
    Safe,
    Moderate,
    Ambitious,
}

/// Minimum bar a target sets. Test minimums are kept as the catalog's text
/// (`"300+"`, `"6.5"`); callers extract the number they need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSet {
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub gre: Option<String>,
    #[serde(default)]
    pub gmat: Option<String>,
    #[serde(default)]
    pub ielts: Option<String>,
    #[serde(default)]
    pub toefl: Option<String>,
    #[serde(default)]
    pub lors: Option<u32>,
    #[serde(default)]
    pub sop: Option<String>,
    #[serde(default)]
    pub work_exp: Option<String>,
}

impl RequirementSet {
    /// A statement of purpose is expected unless the catalog says otherwise
    /// ("Not required", "Optional") or omits it.
    pub fn requires_sop(&self) -> bool {
        match self.sop.as_deref().map(|s| s.trim().to_lowercase()) {
            None => false,
            Some(s) => !(s.is_empty() || s.starts_with("not") || s.starts_with("optional")),
        }
    }
}

/// The "competitive" bar: averages of admitted students.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AverageAdmittedProfile {
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub gre: Option<f64>,
    #[serde(default)]
    pub gmat: Option<f64>,
    #[serde(default)]
    pub ielts: Option<f64>,
    #[serde(default)]
    pub toefl: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub id: u32,
    pub name: String,
    pub category: TargetCategory,
    pub match_score: u32,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub fees: String,
    #[serde(default)]
    pub ranking: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub acceptance_rate: String,
    pub requirements: RequirementSet,
    #[serde(default)]
    pub average_profile: AverageAdmittedProfile,
}

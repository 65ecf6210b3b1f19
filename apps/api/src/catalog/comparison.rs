use serde::{Deserialize, Serialize};

use crate::models::numeric::extract_decimal;
use crate::models::profile::Profile;
use crate::models::target::TargetRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Met,
    Below,
    Missing,
}

/// One row of the target-detail requirements table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementCheck {
    pub label: String,
    pub requirement: String,
    pub user_value: Option<String>,
    pub status: CheckStatus,
}

/// Compares a profile value with a catalog minimum. Both sides keep only
/// digits and dots before comparing. A blank user value is `Missing`; an
/// unreadable number on either side is `Below`.
pub fn check_requirement(requirement: &str, user_value: &str) -> CheckStatus {
    if user_value.trim().is_empty() {
        return CheckStatus::Missing;
    }
    match (extract_decimal(requirement), extract_decimal(user_value)) {
        (Some(required), Some(user)) if user >= required => CheckStatus::Met,
        _ => CheckStatus::Below,
    }
}

/// Builds the GPA/GRE/IELTS/TOEFL rows for the target-detail page. Rows are
/// only produced for requirements the target actually lists.
pub fn compare_profile(target: &TargetRecord, profile: &Profile) -> Vec<RequirementCheck> {
    let reqs = &target.requirements;
    let rows = [
        ("GPA", reqs.gpa.as_deref(), profile.gpa_value.as_str()),
        ("GRE", reqs.gre.as_deref(), profile.gre_total.as_str()),
        ("IELTS", reqs.ielts.as_deref(), profile.ielts_score.as_str()),
        ("TOEFL", reqs.toefl.as_deref(), profile.toefl_score.as_str()),
    ];

    rows.into_iter()
        .filter_map(|(label, requirement, user_value)| {
            let requirement = requirement?;
            let user_value = user_value.trim();
            Some(RequirementCheck {
                label: label.to_string(),
                requirement: requirement.to_string(),
                user_value: (!user_value.is_empty()).then(|| user_value.to_string()),
                status: check_requirement(requirement, user_value),
            })
        })
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::models::assessment::SelfReported;

/// Applicant profile as submitted by the profile-creation form.
/// Every field defaults to empty so half-filled blobs still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub email: String,
    pub intake_year: SelfReported,
    pub degree_level_target: String,
    pub intended_majors: Vec<String>,
    pub preferred_countries: Vec<String>,
    pub budget_total_per_year: SelfReported,
    pub currency: String,
    pub highest_education: String,
    pub gpa_status: String,

    pub english_test_type: String,
    pub toefl_score: SelfReported,
    pub ielts_score: SelfReported,
    pub duolingo_score: SelfReported,
    pub english_exempt_reason: String,

    pub gpa_value: SelfReported,
    pub gpa_scale: String,
    pub grading_system: String,
    pub language_of_instruction_preference: String,

    pub sat_total: SelfReported,
    pub act_composite: SelfReported,
    pub gre_total: SelfReported,
    pub gmat_total: SelfReported,
    pub test_status: String,
    pub test_policy: String,

    pub transcript_upload_url: String,
    pub resume_url: String,
    pub portfolio_url: String,
    pub github_url: String,

    pub need_scholarship: bool,
    pub allow_high_cost_of_living: bool,
    pub ranking_priority: String,
    pub co_op_or_internship_required: bool,
    pub post_study_work_priority: bool,
    pub university_shortlist: String,
}

/// Fields the profile rule table can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Email,
    IntakeYear,
    DegreeLevelTarget,
    IntendedMajors,
    PreferredCountries,
    BudgetTotalPerYear,
    Currency,
    HighestEducation,
    GpaStatus,
    EnglishTestType,
    ToeflScore,
    IeltsScore,
    DuolingoScore,
    EnglishExemptReason,
    GpaValue,
    GpaScale,
    LanguageOfInstructionPreference,
}

impl ProfileField {
    pub fn name(self) -> &'static str {
        match self {
            ProfileField::Email => "email",
            ProfileField::IntakeYear => "intake_year",
            ProfileField::DegreeLevelTarget => "degree_level_target",
            ProfileField::IntendedMajors => "intended_majors",
            ProfileField::PreferredCountries => "preferred_countries",
            ProfileField::BudgetTotalPerYear => "budget_total_per_year",
            ProfileField::Currency => "currency",
            ProfileField::HighestEducation => "highest_education",
            ProfileField::GpaStatus => "gpa_status",
            ProfileField::EnglishTestType => "english_test_type",
            ProfileField::ToeflScore => "toefl_score",
            ProfileField::IeltsScore => "ielts_score",
            ProfileField::DuolingoScore => "duolingo_score",
            ProfileField::EnglishExemptReason => "english_exempt_reason",
            ProfileField::GpaValue => "gpa_value",
            ProfileField::GpaScale => "gpa_scale",
            ProfileField::LanguageOfInstructionPreference => "language_of_instruction_preference",
        }
    }
}

impl Profile {
    /// Text of a field; list fields report their first entry.
    pub fn text_of(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Email => &self.email,
            ProfileField::IntakeYear => self.intake_year.as_str(),
            ProfileField::DegreeLevelTarget => &self.degree_level_target,
            ProfileField::IntendedMajors => first_or_empty(&self.intended_majors),
            ProfileField::PreferredCountries => first_or_empty(&self.preferred_countries),
            ProfileField::BudgetTotalPerYear => self.budget_total_per_year.as_str(),
            ProfileField::Currency => &self.currency,
            ProfileField::HighestEducation => &self.highest_education,
            ProfileField::GpaStatus => &self.gpa_status,
            ProfileField::EnglishTestType => &self.english_test_type,
            ProfileField::ToeflScore => self.toefl_score.as_str(),
            ProfileField::IeltsScore => self.ielts_score.as_str(),
            ProfileField::DuolingoScore => self.duolingo_score.as_str(),
            ProfileField::EnglishExemptReason => &self.english_exempt_reason,
            ProfileField::GpaValue => self.gpa_value.as_str(),
            ProfileField::GpaScale => &self.gpa_scale,
            ProfileField::LanguageOfInstructionPreference => {
                &self.language_of_instruction_preference
            }
        }
    }
}

fn first_or_empty(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or("")
}

/// Study preferences captured after the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Requirements {
    pub target_country: String,
    pub target_course: String,
    pub study_level: String,
    pub work_experience: String,
    pub preferred_universities: String,
    pub start_date: String,
    pub priorities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_tolerates_partial_blob() {
        let profile: Profile = serde_json::from_value(json!({
            "email": "sam@example.com",
            "intake_year": 2026,
            "preferred_countries": ["Germany", ""],
            "need_scholarship": true,
            "some_future_field": "ignored"
        }))
        .unwrap();
        assert_eq!(profile.text_of(ProfileField::IntakeYear), "2026");
        assert_eq!(profile.text_of(ProfileField::PreferredCountries), "Germany");
        assert_eq!(profile.text_of(ProfileField::IntendedMajors), "");
        assert!(profile.need_scholarship);
    }

    #[test]
    fn test_requirements_use_camel_case_keys() {
        let reqs: Requirements = serde_json::from_value(json!({
            "targetCountry": "UK",
            "startDate": "2026-09",
            "priorities": ["ranking", "cost"]
        }))
        .unwrap();
        assert_eq!(reqs.target_country, "UK");
        assert_eq!(reqs.start_date, "2026-09");
        assert_eq!(reqs.priorities.len(), 2);
    }
}

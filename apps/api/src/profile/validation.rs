use crate::models::profile::{Profile, ProfileField, Requirements};

/// When a rule applies.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    Always,
    /// Field equals the value, ignoring case and surrounding whitespace.
    Equals(ProfileField, &'static str),
    /// Any preferred country is in the list.
    AnyCountryIn(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub when: Condition,
    pub require: &'static [ProfileField],
}

const NON_ENGLISH_INSTRUCTION_COUNTRIES: &[&str] = &["Germany", "France", "Netherlands", "Switzerland"];

/// Conditional requirements of the profile form.
pub const PROFILE_RULES: &[FieldRule] = &[
    FieldRule {
        when: Condition::Always,
        require: &[
            ProfileField::Email,
            ProfileField::IntakeYear,
            ProfileField::DegreeLevelTarget,
            ProfileField::IntendedMajors,
            ProfileField::PreferredCountries,
            ProfileField::BudgetTotalPerYear,
            ProfileField::Currency,
            ProfileField::HighestEducation,
            ProfileField::GpaStatus,
            ProfileField::EnglishTestType,
        ],
    },
    FieldRule {
        when: Condition::Equals(ProfileField::GpaStatus, "known"),
        require: &[ProfileField::GpaValue, ProfileField::GpaScale],
    },
    FieldRule {
        when: Condition::Equals(ProfileField::EnglishTestType, "toefl"),
        require: &[ProfileField::ToeflScore],
    },
    FieldRule {
        when: Condition::Equals(ProfileField::EnglishTestType, "ielts"),
        require: &[ProfileField::IeltsScore],
    },
    FieldRule {
        when: Condition::Equals(ProfileField::EnglishTestType, "duolingo"),
        require: &[ProfileField::DuolingoScore],
    },
    FieldRule {
        when: Condition::Equals(ProfileField::EnglishTestType, "exempt"),
        require: &[ProfileField::EnglishExemptReason],
    },
    FieldRule {
        when: Condition::AnyCountryIn(NON_ENGLISH_INSTRUCTION_COUNTRIES),
        require: &[ProfileField::LanguageOfInstructionPreference],
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub passed: bool,
    pub missing: Vec<&'static str>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_parts(missing: Vec<&'static str>, errors: Vec<String>) -> Self {
        Self {
            passed: missing.is_empty() && errors.is_empty(),
            missing,
            errors,
        }
    }

    /// One-line summary for error responses.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing required fields: {}", self.missing.join(", ")));
        }
        parts.extend(self.errors.iter().cloned());
        parts.join("; ")
    }
}

impl Condition {
    fn holds(self, profile: &Profile) -> bool {
        match self {
            Condition::Always => true,
            Condition::Equals(field, value) => {
                profile.text_of(field).trim().eq_ignore_ascii_case(value)
            }
            Condition::AnyCountryIn(countries) => profile.preferred_countries.iter().any(|c| {
                countries
                    .iter()
                    .any(|listed| c.trim().eq_ignore_ascii_case(listed))
            }),
        }
    }
}

/// Lists every required field left blank, in rule-table order, plus format
/// errors for email and intake year.
pub fn validate_profile(profile: &Profile, current_year: i32) -> ValidationReport {
    let mut missing = Vec::new();
    for rule in PROFILE_RULES.iter().filter(|r| r.when.holds(profile)) {
        for field in rule.require {
            if profile.text_of(*field).trim().is_empty() && !missing.contains(&field.name()) {
                missing.push(field.name());
            }
        }
    }

    let mut errors = Vec::new();
    if !profile.email.trim().is_empty() && !looks_like_email(&profile.email) {
        errors.push(format!("email '{}' is not a valid address", profile.email.trim()));
    }
    if !profile.intake_year.is_blank() {
        match profile.intake_year.as_str().trim().parse::<i32>() {
            Ok(year) if year < current_year => {
                errors.push(format!("intake_year {year} is in the past"))
            }
            Ok(_) => {}
            Err(_) => errors.push("intake_year must be a year".to_string()),
        }
    }

    ValidationReport::from_parts(missing, errors)
}

pub fn validate_requirements(requirements: &Requirements) -> ValidationReport {
    let fields = [
        ("targetCountry", &requirements.target_country),
        ("studyLevel", &requirements.study_level),
        ("targetCourse", &requirements.target_course),
        ("startDate", &requirements.start_date),
    ];
    let missing = fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
    ValidationReport::from_parts(missing, Vec::new())
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

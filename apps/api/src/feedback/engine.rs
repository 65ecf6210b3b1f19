//! Rule set of the feedback engine.
//!
//! Categories are evaluated in a fixed order and their findings are emitted
//! in that order; the UI renders them as-is. Algorithm per category:
//!
//! - language tests (IELTS, TOEFL): below minimum → critical, below admitted
//!   average → warning, otherwise success
//! - standardized test (GRE, else GMAT): critical / warning tiers only
//! - letters of recommendation: deficit → critical, otherwise success
//! - statement of purpose: not started → critical, in progress → warning
//! - overall readiness: share of categories marked completed
//!
//! Free-text values that do not read as numbers skip their category.

use crate::feedback::{FeedbackFinding, FeedbackReport, FindingCategory, Priority, Severity};
use crate::models::assessment::{AssessmentRecord, CompletionStatus, SelfReported};
use crate::models::numeric::{extract_digits, parse_leading_number};
use crate::models::target::TargetRecord;

/// Used when the catalog has no GMAT average for a target.
pub const DEFAULT_GMAT_AVERAGE: f64 = 650.0;

const READY_THRESHOLD: f64 = 70.0;
const PARTIAL_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageTest {
    Ielts,
    Toefl,
}

impl LanguageTest {
    const ORDER: [LanguageTest; 2] = [LanguageTest::Ielts, LanguageTest::Toefl];

    fn category(self) -> FindingCategory {
        match self {
            LanguageTest::Ielts => FindingCategory::Ielts,
            LanguageTest::Toefl => FindingCategory::Toefl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardizedTest {
    Gre,
    Gmat,
}

impl StandardizedTest {
    /// Tie-break between the two tests: GRE whenever the applicant entered a
    /// GRE value, GMAT only when GRE is blank. `None` if both are blank.
    pub fn select(assessment: &AssessmentRecord) -> Option<(Self, &SelfReported)> {
        if !assessment.gre.score.is_blank() {
            Some((StandardizedTest::Gre, &assessment.gre.score))
        } else if !assessment.gmat.score.is_blank() {
            Some((StandardizedTest::Gmat, &assessment.gmat.score))
        } else {
            None
        }
    }

    fn category(self) -> FindingCategory {
        match self {
            StandardizedTest::Gre => FindingCategory::Gre,
            StandardizedTest::Gmat => FindingCategory::Gmat,
        }
    }
}

pub fn generate_feedback(target: &TargetRecord, assessment: &AssessmentRecord) -> FeedbackReport {
    let mut findings = Vec::new();

    for test in LanguageTest::ORDER {
        findings.extend(language_finding(test, target, assessment));
    }
    findings.extend(standardized_finding(target, assessment));
    findings.extend(lor_finding(target, assessment));
    findings.extend(sop_finding(target, assessment));

    let (overall, overall_score) = overall_finding(assessment);
    findings.push(overall);

    let high_priority_count = findings
        .iter()
        .filter(|f| f.priority == Priority::High)
        .count();

    FeedbackReport {
        findings,
        overall_score,
        high_priority_count,
    }
}

fn finding(
    category: FindingCategory,
    severity: Severity,
    priority: Priority,
    title: String,
    message: String,
    action: String,
) -> FeedbackFinding {
    FeedbackFinding {
        category,
        severity,
        title,
        message,
        action,
        priority,
    }
}

fn language_finding(
    test: LanguageTest,
    target: &TargetRecord,
    assessment: &AssessmentRecord,
) -> Option<FeedbackFinding> {
    let (item, requirement, average) = match test {
        LanguageTest::Ielts => (
            &assessment.ielts,
            target.requirements.ielts.as_deref(),
            target.average_profile.ielts,
        ),
        LanguageTest::Toefl => (
            &assessment.toefl,
            target.requirements.toefl.as_deref(),
            target.average_profile.toefl,
        ),
    };

    let user = item.score.as_number()?;
    let required = parse_leading_number(requirement?)?;
    let label = test.category().label();

    if user < required {
        return Some(finding(
            test.category(),
            Severity::Critical,
            Priority::High,
            format!("{label} Score Below Requirement"),
            format!(
                "Your {label} score ({user}) is below {}'s minimum requirement ({required}). You must retake the exam.",
                target.name
            ),
            format!("Retake {label} exam"),
        ));
    }

    if let Some(average) = average.filter(|avg| user < *avg) {
        return Some(finding(
            test.category(),
            Severity::Warning,
            Priority::Medium,
            format!("{label} Score Below Average"),
            format!(
                "Your {label} score ({user}) meets the minimum but is below the average admitted student ({average}). Consider retaking for a stronger application."
            ),
            format!("Consider retaking {label}"),
        ));
    }

    let message = match average {
        Some(_) => format!(
            "Your {label} score ({user}) is competitive and above the average admitted student score."
        ),
        None => format!(
            "Your {label} score ({user}) meets {}'s minimum requirement ({required}).",
            target.name
        ),
    };
    Some(finding(
        test.category(),
        Severity::Success,
        Priority::Low,
        format!("Strong {label} Score"),
        message,
        "Maintain current score".to_string(),
    ))
}

/// Clearing both bars produces no finding for this category.
fn standardized_finding(
    target: &TargetRecord,
    assessment: &AssessmentRecord,
) -> Option<FeedbackFinding> {
    let (test, score) = StandardizedTest::select(assessment)?;
    let (requirement, average) = match test {
        StandardizedTest::Gre => (target.requirements.gre.as_deref(), target.average_profile.gre),
        StandardizedTest::Gmat => (
            target.requirements.gmat.as_deref(),
            Some(target.average_profile.gmat.unwrap_or(DEFAULT_GMAT_AVERAGE)),
        ),
    };

    let user = score.as_number()?;
    let required = extract_digits(requirement?)?;
    let label = test.category().label();

    if user < required {
        return Some(finding(
            test.category(),
            Severity::Critical,
            Priority::High,
            format!("{label} Score Below Requirement"),
            format!(
                "Your {label} score ({user}) is below the minimum requirement ({required}). Retake recommended."
            ),
            format!("Retake {label} exam"),
        ));
    }

    let average = average.filter(|avg| user < *avg)?;
    Some(finding(
        test.category(),
        Severity::Warning,
        Priority::Medium,
        format!("{label} Score Below Average"),
        format!(
            "Your {label} score ({user}) meets minimum requirements but is below average ({average})."
        ),
        format!("Consider retaking {label}"),
    ))
}

fn lor_finding(target: &TargetRecord, assessment: &AssessmentRecord) -> Option<FeedbackFinding> {
    let required = i64::from(target.requirements.lors?);
    // Counts are whole letters; "2.5" reads as 2.
    let current = assessment.lors.count.as_number()?.floor().max(0.0) as i64;
    let needed = required - current;

    if needed > 0 {
        return Some(finding(
            FindingCategory::Lors,
            Severity::Critical,
            Priority::High,
            "Missing Letters of Recommendation".to_string(),
            format!(
                "You need {needed} more letter(s) of recommendation. Start reaching out to professors, managers, or mentors now."
            ),
            format!("Secure {needed} more LOR(s)"),
        ));
    }

    Some(finding(
        FindingCategory::Lors,
        Severity::Success,
        Priority::Low,
        "Letters of Recommendation Complete".to_string(),
        format!(
            "You have secured all required letters of recommendation ({current}/{required})."
        ),
        "Follow up on submission".to_string(),
    ))
}

/// Only unfinished statements produce a finding.
fn sop_finding(target: &TargetRecord, assessment: &AssessmentRecord) -> Option<FeedbackFinding> {
    if !target.requirements.requires_sop() {
        return None;
    }

    match assessment.sop.status {
        CompletionStatus::NotStarted => Some(finding(
            FindingCategory::Sop,
            Severity::Critical,
            Priority::High,
            "Statement of Purpose Not Started".to_string(),
            "Your SOP is a critical component. Start drafting immediately to allow time for multiple revisions.".to_string(),
            "Begin SOP draft".to_string(),
        )),
        CompletionStatus::InProgress => Some(finding(
            FindingCategory::Sop,
            Severity::Warning,
            Priority::Medium,
            "Complete Your Statement of Purpose".to_string(),
            "Your SOP draft is in progress. Get feedback from mentors and finalize it soon.".to_string(),
            "Finalize SOP".to_string(),
        )),
        CompletionStatus::Completed => None,
    }
}

/// Readiness summary. Never high priority.
fn overall_finding(assessment: &AssessmentRecord) -> (FeedbackFinding, u32) {
    let total = assessment.total_categories();
    let completion_rate = if total == 0 {
        0.0
    } else {
        100.0 * assessment.completed_count() as f64 / total as f64
    };
    let score = completion_rate.round() as u32;

    let (severity, priority, outlook, action) = if completion_rate > READY_THRESHOLD {
        (
            Severity::Success,
            Priority::Low,
            "You're on track!",
            "Review and submit",
        )
    } else if completion_rate > PARTIAL_THRESHOLD {
        (
            Severity::Warning,
            Priority::Medium,
            "Focus on completing remaining requirements.",
            "Complete missing items",
        )
    } else {
        (
            Severity::Critical,
            Priority::Medium,
            "Focus on completing remaining requirements.",
            "Complete missing items",
        )
    };

    let finding = finding(
        FindingCategory::Overall,
        severity,
        priority,
        "Application Readiness".to_string(),
        format!("Your application is {score}% complete. {outlook}"),
        action.to_string(),
    );
    (finding, score)
}

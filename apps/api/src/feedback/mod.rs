//! Feedback engine: rule-based guidance from a self-assessment.
//!
//! `generate_feedback` is a pure function of (target, assessment). Handlers
//! load the inputs and persist nothing derived from the report.

pub mod engine;
pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::assessment::AssessmentRecord;

pub use engine::generate_feedback;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Success,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FindingCategory {
    #[serde(rename = "IELTS")]
    Ielts,
    #[serde(rename = "TOEFL")]
    Toefl,
    #[serde(rename = "GRE")]
    Gre,
    #[serde(rename = "GMAT")]
    Gmat,
    #[serde(rename = "LORs")]
    Lors,
    #[serde(rename = "SOP")]
    Sop,
    Overall,
}

impl FindingCategory {
    pub fn label(self) -> &'static str {
        match self {
            FindingCategory::Ielts => "IELTS",
            FindingCategory::Toefl => "TOEFL",
            FindingCategory::Gre => "GRE",
            FindingCategory::Gmat => "GMAT",
            FindingCategory::Lors => "LORs",
            FindingCategory::Sop => "SOP",
            FindingCategory::Overall => "Overall",
        }
    }
}

/// One unit of generated feedback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackFinding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub action: String,
    pub priority: Priority,
}

/// Findings in fixed category order plus the aggregate readiness numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackReport {
    pub findings: Vec<FeedbackFinding>,
    pub overall_score: u32,
    pub high_priority_count: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("Target {0} not found")]
    TargetNotFound(String),
}

impl From<FeedbackError> for AppError {
    fn from(e: FeedbackError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

/// Resolves `target_id` in the catalog and runs the engine.
pub fn feedback_for(
    catalog: &Catalog,
    target_id: &str,
    assessment: &AssessmentRecord,
) -> Result<FeedbackReport, FeedbackError> {
    let target = catalog
        .get_target_by_id(target_id)
        .ok_or_else(|| FeedbackError::TargetNotFound(target_id.to_string()))?;
    Ok(generate_feedback(target, assessment))
}

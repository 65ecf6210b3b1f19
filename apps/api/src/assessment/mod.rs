//! Self-assessment records: partial updates from the assessment form.

pub mod handlers;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::errors::AppError;
use crate::models::assessment::{AssessmentCategory, AssessmentRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentPatchError {
    #[error("assessment patch must be a JSON object")]
    NotAnObject,

    #[error("unknown assessment category '{0}'")]
    UnknownCategory(String),

    #[error("update for '{0}' must be a JSON object")]
    CategoryNotObject(String),

    #[error("category '{category}' has no field '{field}'")]
    UnknownField { category: String, field: String },

    #[error("invalid assessment values: {0}")]
    Invalid(String),
}

impl From<AssessmentPatchError> for AppError {
    fn from(e: AssessmentPatchError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Merges `patch` into `record`, one category at a time.
///
/// Shape: `{"<category>": {"<field>": value, ...}, ...}`. Categories and
/// fields not named in the patch keep their current values.
pub fn apply_patch(
    record: &AssessmentRecord,
    patch: &Value,
) -> Result<AssessmentRecord, AssessmentPatchError> {
    let updates = patch.as_object().ok_or(AssessmentPatchError::NotAnObject)?;

    let mut merged = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => return Err(AssessmentPatchError::Invalid(e.to_string())),
    };

    for (key, update) in updates {
        let category = AssessmentCategory::from_key(key)
            .ok_or_else(|| AssessmentPatchError::UnknownCategory(key.clone()))?;
        let fields = update
            .as_object()
            .ok_or_else(|| AssessmentPatchError::CategoryNotObject(key.clone()))?;

        let Some(Value::Object(current)) = merged.get_mut(category.key()) else {
            return Err(AssessmentPatchError::UnknownCategory(key.clone()));
        };
        for (field, value) in fields {
            let slot = current
                .get_mut(field)
                .ok_or_else(|| AssessmentPatchError::UnknownField {
                    category: key.clone(),
                    field: field.clone(),
                })?;
            *slot = value.clone();
        }
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| AssessmentPatchError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{CompletionStatus, SelfReported};
    use serde_json::json;

    fn filled() -> AssessmentRecord {
        let mut record = AssessmentRecord::default();
        record.ielts.score = SelfReported::new("7.0");
        record.ielts.status = CompletionStatus::Completed;
        record.gre.score = SelfReported::new("320");
        record.lors.count = SelfReported::new("2");
        record.sop.status = CompletionStatus::InProgress;
        record
    }

    #[test]
    fn test_patch_preserves_untouched_categories() {
        let record = filled();
        let patched = apply_patch(&record, &json!({ "gre": { "status": "completed" } })).unwrap();

        assert_eq!(patched.gre.status, CompletionStatus::Completed);
        assert_eq!(patched.gre.score.as_str(), "320");
        assert_eq!(patched.ielts, record.ielts);
        assert_eq!(patched.lors, record.lors);
        assert_eq!(patched.sop, record.sop);
        assert_eq!(patched.transcripts, record.transcripts);
        assert_eq!(patched.work_experience, record.work_experience);
    }

    #[test]
    fn test_patch_accepts_numeric_scores() {
        let patched = apply_patch(
            &AssessmentRecord::default(),
            &json!({ "toefl": { "score": 101 }, "workExperience": { "years": 3 } }),
        )
        .unwrap();
        assert_eq!(patched.toefl.score.as_str(), "101");
        assert_eq!(patched.work_experience.years.as_str(), "3");
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let record = filled();
        assert_eq!(apply_patch(&record, &json!({})).unwrap(), record);
    }

    #[test]
    fn test_patch_rejects_bad_shapes() {
        let record = AssessmentRecord::default();
        assert_eq!(
            apply_patch(&record, &json!([1, 2])),
            Err(AssessmentPatchError::NotAnObject)
        );
        assert_eq!(
            apply_patch(&record, &json!({ "essay": { "status": "completed" } })),
            Err(AssessmentPatchError::UnknownCategory("essay".to_string()))
        );
        assert_eq!(
            apply_patch(&record, &json!({ "sop": "completed" })),
            Err(AssessmentPatchError::CategoryNotObject("sop".to_string()))
        );
        assert_eq!(
            apply_patch(&record, &json!({ "sop": { "score": "9" } })),
            Err(AssessmentPatchError::UnknownField {
                category: "sop".to_string(),
                field: "score".to_string()
            })
        );
    }

    #[test]
    fn test_patch_rejects_unknown_status() {
        let result = apply_patch(
            &AssessmentRecord::default(),
            &json!({ "sop": { "status": "done" } }),
        );
        assert!(matches!(result, Err(AssessmentPatchError::Invalid(_))));
    }
}

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::numeric::parse_leading_number;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// A value the applicant typed into the assessment form.
///
/// Stored as text; the decoder also accepts JSON numbers and `null` because
/// browsers submit both depending on the input widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelfReported(String);

impl SelfReported {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `None` for blank or non-numeric input.
    pub fn as_number(&self) -> Option<f64> {
        parse_leading_number(&self.0)
    }
}

impl<'de> Deserialize<'de> for SelfReported {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(s)) => SelfReported(s),
            Some(Raw::Number(n)) => SelfReported(n.to_string()),
            None => SelfReported::default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreItem {
    pub score: SelfReported,
    pub status: CompletionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorItem {
    pub count: SelfReported,
    pub status: CompletionStatus,
}

impl Default for LorItem {
    fn default() -> Self {
        Self {
            count: SelfReported::new("0"),
            status: CompletionStatus::NotStarted,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusItem {
    pub status: CompletionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearsItem {
    pub years: SelfReported,
    pub status: CompletionStatus,
}

/// Tracked admission requirements, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentCategory {
    Gmat,
    Gre,
    Ielts,
    Toefl,
    Lors,
    Sop,
    Transcripts,
    WorkExperience,
}

impl AssessmentCategory {
    pub const ALL: [AssessmentCategory; 8] = [
        AssessmentCategory::Gmat,
        AssessmentCategory::Gre,
        AssessmentCategory::Ielts,
        AssessmentCategory::Toefl,
        AssessmentCategory::Lors,
        AssessmentCategory::Sop,
        AssessmentCategory::Transcripts,
        AssessmentCategory::WorkExperience,
    ];

    /// Key used in the stored blob.
    pub fn key(self) -> &'static str {
        match self {
            AssessmentCategory::Gmat => "gmat",
            AssessmentCategory::Gre => "gre",
            AssessmentCategory::Ielts => "ielts",
            AssessmentCategory::Toefl => "toefl",
            AssessmentCategory::Lors => "lors",
            AssessmentCategory::Sop => "sop",
            AssessmentCategory::Transcripts => "transcripts",
            AssessmentCategory::WorkExperience => "workExperience",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Per-target self-assessment. Every category is always present; a blob
/// missing some of them decodes with those categories at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub gmat: ScoreItem,
    pub gre: ScoreItem,
    pub ielts: ScoreItem,
    pub toefl: ScoreItem,
    pub lors: LorItem,
    pub sop: StatusItem,
    pub transcripts: StatusItem,
    pub work_experience: YearsItem,
}

impl AssessmentRecord {
    pub fn status_of(&self, category: AssessmentCategory) -> CompletionStatus {
        match category {
            AssessmentCategory::Gmat => self.gmat.status,
            AssessmentCategory::Gre => self.gre.status,
            AssessmentCategory::Ielts => self.ielts.status,
            AssessmentCategory::Toefl => self.toefl.status,
            AssessmentCategory::Lors => self.lors.status,
            AssessmentCategory::Sop => self.sop.status,
            AssessmentCategory::Transcripts => self.transcripts.status,
            AssessmentCategory::WorkExperience => self.work_experience.status,
        }
    }

    pub fn total_categories(&self) -> usize {
        AssessmentCategory::ALL.len()
    }

    pub fn completed_count(&self) -> usize {
        AssessmentCategory::ALL
            .into_iter()
            .filter(|c| self.status_of(*c) == CompletionStatus::Completed)
            .count()
    }
}

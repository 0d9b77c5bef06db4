// src/models/result_record.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-subject totals inside a result record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectBreakdown {
    pub total: i64,
    pub correct: i64,
    pub incorrect: i64,
    pub unattempted: i64,
    pub score: i64,
}

/// Scored outcome of a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question_id: String,
    pub prompt: String,
    /// Display text of the chosen option; `None` when unattempted.
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub score: i64,
    /// Subject display name.
    pub subject: String,
    pub chapter: String,
    pub is_correct: bool,
}

/// Why a question could not be scored normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// No option is flagged correct. The question is excluded.
    NoCorrectOption,
    /// More than one option is flagged correct. The question is excluded.
    MultipleCorrectOptions { count: usize },
    /// The subject id is missing from the catalog. The question is excluded.
    UnknownSubject { subject: String },
    /// The selection names an option the question does not have.
    /// The question is still scored as incorrect.
    UnknownOption { option: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityWarning {
    pub question_id: String,
    #[serde(flatten)]
    pub issue: IntegrityIssue,
}

/// Immutable outcome of scoring one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub user_id: String,
    pub test_name: String,
    pub timestamp: DateTime<Utc>,

    pub total_questions: i64,
    pub attempted_questions: i64,
    pub correct_answers: i64,
    pub incorrect_answers: i64,

    /// Sum of per-question scores. Negative marking can push this below zero.
    pub score: i64,
    /// Percentage of attempted questions answered correctly.
    pub accuracy: f64,
    pub time_taken_secs: i64,

    /// Keyed by subject display name.
    pub subject_analysis: BTreeMap<String, SubjectBreakdown>,
    pub questions: Vec<QuestionDetail>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

/// A result record as it lives in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: ResultRecord,
}

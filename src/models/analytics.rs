// src/models/analytics.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cumulative standing of one user across all result records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    /// 1-based position.
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub total_score: i64,
    pub total_tests: usize,
}

/// Per-subject performance summary for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAnalytics {
    pub subject: String,
    pub total_tests: usize,
    pub average_score: f64,
    pub best_score: i64,
    /// Up to three chapters, lowest average first.
    pub weak_chapters: Vec<String>,
    /// Up to three chapters, highest average first.
    pub strong_chapters: Vec<String>,
    pub total_time_taken: f64,
    pub average_time_taken: f64,
}

/// Reasons a result record is kept out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    ScoreOutOfRange,
    NegativeTime,
    NegativeCorrect,
    NoQuestions,
    CorrectExceedsTotal,
    /// `correct_answers` disagrees with the per-question entries flagged correct.
    CorrectMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRejection {
    pub record_id: Option<Uuid>,
    pub reason: ValidationFailure,
}

/// Subject analytics plus an account of the records that were left out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubjectAnalyticsReport {
    pub subjects: Vec<SubjectAnalytics>,
    pub rejected_records: usize,
    pub rejections: Vec<RecordRejection>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
}

// src/models/attempt.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::question::{PublicQuestion, Question};

/// Configuration of a test as the user set it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    /// Subject ids covered by the test.
    pub subjects: Vec<String>,
    /// Number of questions per subject id.
    pub question_counts: BTreeMap<String, u32>,
    pub time_limit_secs: u64,
}

impl TestDefinition {
    /// Derives subjects and per-subject counts from the questions actually drawn.
    pub fn for_questions(name: impl Into<String>, questions: &[Question], time_limit_secs: u64) -> Self {
        let mut question_counts = BTreeMap::new();
        for q in questions {
            *question_counts.entry(q.subject.clone()).or_insert(0) += 1;
        }

        Self {
            name: name.into(),
            subjects: question_counts.keys().cloned().collect(),
            question_counts,
            time_limit_secs,
        }
    }
}

/// A finished interaction with a set of questions, ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub user_id: String,
    pub test: TestDefinition,

    /// Question id -> selected option id. Missing entries are unattempted.
    pub selections: HashMap<String, String>,

    /// Seconds left on the countdown when the attempt was submitted.
    pub remaining_secs: i64,

    pub submitted_at: DateTime<Utc>,
}

impl Attempt {
    /// Elapsed seconds, clamped to `[0, time_limit]`.
    pub fn time_taken_secs(&self) -> i64 {
        let limit = i64::try_from(self.test.time_limit_secs).unwrap_or(i64::MAX);
        limit.saturating_sub(self.remaining_secs).clamp(0, limit)
    }
}

/// DTO for starting a test session.
#[derive(Debug, Deserialize, Validate)]
pub struct StartAttemptRequest {
    #[validate(length(min = 1, max = 100, message = "Test name must be between 1 and 100 characters."))]
    pub test_name: String,

    #[validate(length(min = 1, max = 500, message = "A test needs between 1 and 500 questions."))]
    pub question_ids: Vec<String>,

    #[validate(range(min = 1, max = 21600, message = "Time limit must be between 1 second and 6 hours."))]
    pub time_limit_secs: u64,
}

/// Response after a test session has been started.
#[derive(Debug, Serialize, Deserialize)]
pub struct StartAttemptResponse {
    pub attempt_id: Uuid,
    pub test_name: String,
    pub time_limit_secs: u64,
    pub questions: Vec<PublicQuestion>,
}

/// DTO for selecting an option during a session.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectAnswerRequest {
    #[validate(length(min = 1))]
    pub question_id: String,
    #[validate(length(min = 1))]
    pub option_id: String,
}

/// Live view of a running session.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptStatus {
    pub attempt_id: Uuid,
    pub remaining_secs: i64,
    pub answered: usize,
    pub total_questions: usize,
    pub submitted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(limit: u64, remaining: i64) -> Attempt {
        Attempt {
            user_id: "u1".to_string(),
            test: TestDefinition {
                name: "t".to_string(),
                subjects: vec![],
                question_counts: BTreeMap::new(),
                time_limit_secs: limit,
            },
            selections: HashMap::new(),
            remaining_secs: remaining,
            submitted_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn time_taken_is_limit_minus_remaining() {
        assert_eq!(attempt(600, 150).time_taken_secs(), 450);
        assert_eq!(attempt(600, 600).time_taken_secs(), 0);
        assert_eq!(attempt(600, 0).time_taken_secs(), 600);
    }

    #[test]
    fn time_taken_is_clamped() {
        // Remaining above the limit would be negative elapsed time.
        assert_eq!(attempt(600, 900).time_taken_secs(), 0);
        // Overshooting the countdown never reports more than the limit.
        assert_eq!(attempt(600, -5).time_taken_secs(), 600);
    }
}

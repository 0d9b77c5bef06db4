// src/engine/validation.rs

use crate::{
    engine::scoring::{CORRECT_SCORE, INCORRECT_SCORE},
    models::{analytics::ValidationFailure, result_record::ResultRecord},
};

/// Checks a stored record before it is allowed into aggregation.
///
/// The score must be reachable under the marking scheme:
/// `-total_questions <= score <= 4 * total_questions`.
pub fn validate_record(record: &ResultRecord) -> Result<(), ValidationFailure> {
    if record.total_questions <= 0 {
        return Err(ValidationFailure::NoQuestions);
    }

    let lowest = record.total_questions.saturating_mul(INCORRECT_SCORE);
    let highest = record.total_questions.saturating_mul(CORRECT_SCORE);
    if record.score < lowest || record.score > highest {
        return Err(ValidationFailure::ScoreOutOfRange);
    }

    if record.time_taken_secs < 0 {
        return Err(ValidationFailure::NegativeTime);
    }

    if record.correct_answers < 0 {
        return Err(ValidationFailure::NegativeCorrect);
    }

    if record.correct_answers > record.total_questions {
        return Err(ValidationFailure::CorrectExceedsTotal);
    }

    let flagged = record.questions.iter().filter(|q| q.is_correct).count() as i64;
    if flagged != record.correct_answers {
        return Err(ValidationFailure::CorrectMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::models::result_record::QuestionDetail;

    fn record(total: i64, correct_flags: usize, correct_answers: i64, score: i64) -> ResultRecord {
        let questions = (0..total.max(0) as usize)
            .map(|i| QuestionDetail {
                question_id: format!("q{}", i),
                prompt: String::new(),
                user_answer: Some("a".to_string()),
                correct_answer: "a".to_string(),
                score: 0,
                subject: "Physics".to_string(),
                chapter: "Optics".to_string(),
                is_correct: i < correct_flags,
            })
            .collect();

        ResultRecord {
            user_id: "u".to_string(),
            test_name: "t".to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            total_questions: total,
            attempted_questions: total,
            correct_answers,
            incorrect_answers: 0,
            score,
            accuracy: 0.0,
            time_taken_secs: 60,
            subject_analysis: BTreeMap::new(),
            questions,
            warnings: vec![],
        }
    }

    #[test]
    fn accepts_consistent_record() {
        assert_eq!(validate_record(&record(5, 3, 3, 10)), Ok(()));
    }

    #[test]
    fn accepts_negative_and_large_scores_within_marking_bounds() {
        assert_eq!(validate_record(&record(5, 0, 0, -5)), Ok(()));
        assert_eq!(validate_record(&record(40, 40, 40, 160)), Ok(()));
    }

    #[test]
    fn rejects_correct_count_mismatch() {
        assert_eq!(
            validate_record(&record(6, 4, 5, 19)),
            Err(ValidationFailure::CorrectMismatch)
        );
    }

    #[test]
    fn rejects_out_of_range_scores() {
        assert_eq!(
            validate_record(&record(5, 0, 0, -6)),
            Err(ValidationFailure::ScoreOutOfRange)
        );
        assert_eq!(
            validate_record(&record(5, 5, 5, 21)),
            Err(ValidationFailure::ScoreOutOfRange)
        );
    }

    #[test]
    fn rejects_structural_problems() {
        assert_eq!(
            validate_record(&record(0, 0, 0, 0)),
            Err(ValidationFailure::NoQuestions)
        );

        let mut negative_time = record(5, 1, 1, 4);
        negative_time.time_taken_secs = -1;
        assert_eq!(
            validate_record(&negative_time),
            Err(ValidationFailure::NegativeTime)
        );

        assert_eq!(
            validate_record(&record(5, 0, -1, 0)),
            Err(ValidationFailure::NegativeCorrect)
        );

        assert_eq!(
            validate_record(&record(2, 2, 3, 8)),
            Err(ValidationFailure::CorrectExceedsTotal)
        );
    }
}

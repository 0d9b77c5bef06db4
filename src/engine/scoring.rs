// src/engine/scoring.rs

use std::collections::BTreeMap;

use crate::{
    models::{
        attempt::Attempt,
        question::Question,
        result_record::{
            IntegrityIssue, IntegrityWarning, QuestionDetail, ResultRecord, SubjectBreakdown,
        },
        subject::SubjectCatalog,
    },
    utils::rounding::round2,
};

/// Marks awarded for a correct answer.
pub const CORRECT_SCORE: i64 = 4;
/// Marks deducted for a wrong answer.
pub const INCORRECT_SCORE: i64 = -1;
/// Marks for a question left blank.
pub const UNATTEMPTED_SCORE: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Correct,
    Incorrect,
    Unattempted,
}

impl Outcome {
    fn score(self) -> i64 {
        match self {
            Outcome::Correct => CORRECT_SCORE,
            Outcome::Incorrect => INCORRECT_SCORE,
            Outcome::Unattempted => UNATTEMPTED_SCORE,
        }
    }
}

impl SubjectBreakdown {
    fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Incorrect => self.incorrect += 1,
            Outcome::Unattempted => self.unattempted += 1,
        }
        self.score += outcome.score();
    }
}

/// Scores a finished attempt against the questions it presented.
///
/// * +4 for a correct selection, -1 for a wrong one, 0 when left blank.
/// * Questions without exactly one correct option, or with a subject missing from
///   `catalog`, are left out of every total and reported in `warnings`.
/// * Pure: the same inputs always produce the same record.
pub fn score(attempt: &Attempt, questions: &[Question], catalog: &SubjectCatalog) -> ResultRecord {
    let mut subject_analysis: BTreeMap<String, SubjectBreakdown> = BTreeMap::new();
    let mut details = Vec::with_capacity(questions.len());
    let mut warnings = Vec::new();

    let mut total_score = 0;
    let mut attempted = 0;
    let mut correct = 0;
    let mut incorrect = 0;

    for question in questions {
        let key = match question.answer_key() {
            Ok(key) => key,
            Err(issue) => {
                exclude(&mut warnings, question, issue);
                continue;
            }
        };

        let Some(subject) = catalog.name_of(&question.subject) else {
            let issue = IntegrityIssue::UnknownSubject {
                subject: question.subject.clone(),
            };
            exclude(&mut warnings, question, issue);
            continue;
        };

        let selection = attempt.selections.get(&question.id);
        let (outcome, user_answer) = match selection {
            None => (Outcome::Unattempted, None),
            Some(option_id) => match question.option(option_id) {
                Some(chosen) if key.is_correct(&chosen.id) => {
                    (Outcome::Correct, Some(chosen.content.text.clone()))
                }
                Some(chosen) => (Outcome::Incorrect, Some(chosen.content.text.clone())),
                None => {
                    tracing::warn!(
                        "Question {} has a selection for unknown option {}; scored as incorrect",
                        question.id,
                        option_id
                    );
                    warnings.push(IntegrityWarning {
                        question_id: question.id.clone(),
                        issue: IntegrityIssue::UnknownOption {
                            option: option_id.clone(),
                        },
                    });
                    (Outcome::Incorrect, None)
                }
            },
        };

        match outcome {
            Outcome::Correct => correct += 1,
            Outcome::Incorrect => incorrect += 1,
            Outcome::Unattempted => {}
        }
        if selection.is_some() {
            attempted += 1;
        }
        total_score += outcome.score();

        subject_analysis
            .entry(subject.to_string())
            .or_default()
            .record(outcome);

        details.push(QuestionDetail {
            question_id: question.id.clone(),
            prompt: question.prompt.text.clone(),
            user_answer,
            correct_answer: key.correct().content.text.clone(),
            score: outcome.score(),
            subject: subject.to_string(),
            chapter: question.chapter.clone(),
            is_correct: outcome == Outcome::Correct,
        });
    }

    let accuracy = if attempted > 0 {
        round2(correct as f64 * 100.0 / attempted as f64)
    } else {
        0.0
    };

    ResultRecord {
        user_id: attempt.user_id.clone(),
        test_name: attempt.test.name.clone(),
        timestamp: attempt.submitted_at,
        total_questions: details.len() as i64,
        attempted_questions: attempted,
        correct_answers: correct,
        incorrect_answers: incorrect,
        score: total_score,
        accuracy,
        time_taken_secs: attempt.time_taken_secs(),
        subject_analysis,
        questions: details,
        warnings,
    }
}

fn exclude(warnings: &mut Vec<IntegrityWarning>, question: &Question, issue: IntegrityIssue) {
    tracing::warn!(
        "Question {} excluded from scoring: {:?}",
        question.id,
        issue
    );
    warnings.push(IntegrityWarning {
        question_id: question.id.clone(),
        issue,
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::models::{
        attempt::TestDefinition,
        question::{Content, QuestionOption},
    };

    fn question(id: &str, subject: &str, chapter: &str, correct: &[bool]) -> Question {
        Question {
            id: id.to_string(),
            prompt: Content::text(format!("Prompt {}", id)),
            options: correct
                .iter()
                .enumerate()
                .map(|(i, &is_correct)| QuestionOption {
                    id: format!("{}-{}", id, i),
                    content: Content::text(format!("{} option {}", id, i)),
                    is_correct,
                })
                .collect(),
            subject: subject.to_string(),
            chapter: chapter.to_string(),
            solution: Content::default(),
        }
    }

    fn attempt(questions: &[Question], selections: &[(&str, &str)]) -> Attempt {
        Attempt {
            user_id: "student".to_string(),
            test: TestDefinition::for_questions("Mock", questions, 600),
            selections: selections
                .iter()
                .map(|(q, o)| (q.to_string(), o.to_string()))
                .collect::<HashMap<_, _>>(),
            remaining_secs: 120,
            submitted_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn scores_correct_incorrect_and_blank() {
        let questions = vec![
            question("q1", "physics", "Optics", &[true, false]),
            question("q2", "physics", "Optics", &[true, false]),
            question("q3", "physics", "Optics", &[true, false]),
        ];
        let attempt = attempt(&questions, &[("q1", "q1-0"), ("q2", "q2-1")]);

        let record = score(&attempt, &questions, &SubjectCatalog::default());

        assert_eq!(record.score, 3);
        assert_eq!(record.total_questions, 3);
        assert_eq!(record.attempted_questions, 2);
        assert_eq!(record.correct_answers, 1);
        assert_eq!(record.incorrect_answers, 1);
        assert_eq!(record.accuracy, 50.0);
        assert_eq!(record.time_taken_secs, 480);
        assert_eq!(
            record.subject_analysis["Physics"],
            SubjectBreakdown {
                total: 3,
                correct: 1,
                incorrect: 1,
                unattempted: 1,
                score: 3
            }
        );

        let scores: Vec<i64> = record.questions.iter().map(|q| q.score).collect();
        assert_eq!(scores, vec![4, -1, 0]);
        assert_eq!(record.questions[0].user_answer.as_deref(), Some("q1 option 0"));
        assert_eq!(record.questions[1].user_answer.as_deref(), Some("q2 option 1"));
        assert_eq!(record.questions[1].correct_answer, "q2 option 0");
        assert_eq!(record.questions[2].user_answer, None);
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn negative_totals_are_kept() {
        let questions = vec![
            question("q1", "chemistry", "Bonding", &[true, false]),
            question("q2", "chemistry", "Bonding", &[true, false]),
        ];
        let attempt = attempt(&questions, &[("q1", "q1-1"), ("q2", "q2-1")]);

        let record = score(&attempt, &questions, &SubjectCatalog::default());
        assert_eq!(record.score, -2);
        assert_eq!(record.accuracy, 0.0);
    }

    #[test]
    fn malformed_questions_are_excluded_with_warnings() {
        let questions = vec![
            question("q1", "biology", "Cells", &[true, true]),
            question("q2", "biology", "Cells", &[false, false]),
            question("q3", "astrology", "Signs", &[true, false]),
            question("q4", "biology", "Cells", &[false, true]),
        ];
        let attempt = attempt(
            &questions,
            &[("q1", "q1-0"), ("q2", "q2-0"), ("q3", "q3-0"), ("q4", "q4-1")],
        );

        let record = score(&attempt, &questions, &SubjectCatalog::default());

        assert_eq!(record.total_questions, 1);
        assert_eq!(record.attempted_questions, 1);
        assert_eq!(record.score, 4);
        assert_eq!(record.questions.len(), 1);
        assert_eq!(
            record.warnings,
            vec![
                IntegrityWarning {
                    question_id: "q1".to_string(),
                    issue: IntegrityIssue::MultipleCorrectOptions { count: 2 },
                },
                IntegrityWarning {
                    question_id: "q2".to_string(),
                    issue: IntegrityIssue::NoCorrectOption,
                },
                IntegrityWarning {
                    question_id: "q3".to_string(),
                    issue: IntegrityIssue::UnknownSubject {
                        subject: "astrology".to_string()
                    },
                },
            ]
        );
        assert!(!record.subject_analysis.contains_key("astrology"));
    }

    #[test]
    fn unknown_option_counts_as_incorrect() {
        let questions = vec![question("q1", "physics", "Waves", &[true, false])];
        let attempt = attempt(&questions, &[("q1", "zz")]);

        let record = score(&attempt, &questions, &SubjectCatalog::default());

        assert_eq!(record.score, -1);
        assert_eq!(record.incorrect_answers, 1);
        assert_eq!(record.attempted_questions, 1);
        assert_eq!(record.questions[0].user_answer, None);
        assert_eq!(
            record.warnings[0].issue,
            IntegrityIssue::UnknownOption {
                option: "zz".to_string()
            }
        );
    }

    #[test]
    fn subjects_without_questions_are_omitted() {
        let questions = vec![question("q1", "physics", "Waves", &[true, false])];
        let record = score(&attempt(&questions, &[]), &questions, &SubjectCatalog::default());

        assert_eq!(record.subject_analysis.len(), 1);
        assert!(record.subject_analysis.contains_key("Physics"));
    }

    #[test]
    fn scoring_is_repeatable() {
        let questions = vec![
            question("q1", "physics", "Waves", &[true, false]),
            question("q2", "chemistry", "Acids", &[false, true]),
            question("q3", "biology", "Cells", &[true, false]),
        ];
        let attempt = attempt(&questions, &[("q1", "q1-0"), ("q2", "q2-0")]);
        let catalog = SubjectCatalog::default();

        let first = score(&attempt, &questions, &catalog);
        let second = score(&attempt, &questions, &catalog);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

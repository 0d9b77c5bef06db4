// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::models::result_record::IntegrityIssue;

/// Text plus an optional image reference, used for prompts, options and solutions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Content {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

/// One candidate answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub content: Content,
    pub is_correct: bool,
}

/// A single assessable item, as stored in the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: Content,
    pub options: Vec<QuestionOption>,

    /// Subject id; resolved to a display name through the `SubjectCatalog`.
    pub subject: String,

    /// Chapter label within the subject. Empty when the question is untagged.
    #[serde(default)]
    pub chapter: String,

    /// Not used in scoring.
    #[serde(default)]
    pub solution: Content,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Builds the answer key for this question, failing on integrity violations.
    pub fn answer_key(&self) -> Result<AnswerKey<'_>, IntegrityIssue> {
        AnswerKey::from_options(&self.options)
    }
}

/// The validated correct option of a question.
///
/// Only constructible when exactly one option carries `is_correct`, so scoring
/// never has to guess which option was meant to be correct.
#[derive(Debug, Clone, Copy)]
pub struct AnswerKey<'a> {
    correct: &'a QuestionOption,
}

impl<'a> AnswerKey<'a> {
    pub fn from_options(options: &'a [QuestionOption]) -> Result<Self, IntegrityIssue> {
        let mut correct = options.iter().filter(|o| o.is_correct);
        match (correct.next(), correct.count()) {
            (None, _) => Err(IntegrityIssue::NoCorrectOption),
            (Some(option), 0) => Ok(Self { correct: option }),
            (Some(_), rest) => Err(IntegrityIssue::MultipleCorrectOptions { count: rest + 1 }),
        }
    }

    pub fn correct(&self) -> &'a QuestionOption {
        self.correct
    }

    pub fn is_correct(&self, option_id: &str) -> bool {
        self.correct.id == option_id
    }
}

/// DTO for sending a question to the test taker (excludes correctness and solution).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: String,
    pub prompt: Content,
    pub options: Vec<PublicOption>,
    pub subject: String,
    pub chapter: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicOption {
    pub id: String,
    pub content: Content,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            prompt: q.prompt.clone(),
            options: q
                .options
                .iter()
                .map(|o| PublicOption {
                    id: o.id.clone(),
                    content: o.content.clone(),
                })
                .collect(),
            subject: q.subject.clone(),
            chapter: q.chapter.clone(),
        }
    }
}

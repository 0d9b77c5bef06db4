// src/store/mod.rs

//! Persistence collaborator: where questions come from and result records go.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        question::Question,
        result_record::{ResultRecord, StoredResult},
    },
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage backend for the exam service.
///
/// Result records are append-only: there is deliberately no update or delete.
#[async_trait]
pub trait ExamStore: Send + Sync {
    /// Fetches the questions with the given ids, in the order requested.
    /// Unknown ids are skipped.
    async fn fetch_questions(&self, ids: &[String]) -> Result<Vec<Question>, AppError>;

    async fn insert_result(&self, record: ResultRecord) -> Result<StoredResult, AppError>;

    async fn get_result(&self, id: Uuid) -> Result<Option<StoredResult>, AppError>;

    /// One user's results, newest first.
    async fn list_user_results(&self, user_id: &str) -> Result<Vec<StoredResult>, AppError>;

    async fn list_all_results(&self) -> Result<Vec<StoredResult>, AppError>;

    async fn upsert_user(&self, user_id: &str, display_name: &str) -> Result<(), AppError>;

    /// User id -> display name for every known user.
    async fn display_names(&self) -> Result<HashMap<String, String>, AppError>;
}

/// Puts fetched questions back into the order they were asked for.
fn in_requested_order(ids: &[String], questions: Vec<Question>) -> Vec<Question> {
    let mut by_id: HashMap<String, Question> =
        questions.into_iter().map(|q| (q.id.clone(), q)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

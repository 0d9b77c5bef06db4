// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ExamStore, in_requested_order};
use crate::{
    error::AppError,
    models::{
        question::Question,
        result_record::{ResultRecord, StoredResult},
    },
};

/// In-process store, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    questions: RwLock<HashMap<String, Question>>,
    results: RwLock<Vec<StoredResult>>,
    users: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_questions(&self, questions: impl IntoIterator<Item = Question>) {
        let mut bank = self.questions.write().await;
        for q in questions {
            bank.insert(q.id.clone(), q);
        }
    }

    pub async fn result_count(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl ExamStore for MemoryStore {
    async fn fetch_questions(&self, ids: &[String]) -> Result<Vec<Question>, AppError> {
        let bank = self.questions.read().await;
        let found = ids.iter().filter_map(|id| bank.get(id).cloned()).collect();
        Ok(in_requested_order(ids, found))
    }

    async fn insert_result(&self, record: ResultRecord) -> Result<StoredResult, AppError> {
        let stored = StoredResult {
            id: Uuid::new_v4(),
            record,
        };
        self.results.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn get_result(&self, id: Uuid) -> Result<Option<StoredResult>, AppError> {
        Ok(self
            .results
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_user_results(&self, user_id: &str) -> Result<Vec<StoredResult>, AppError> {
        let mut results: Vec<StoredResult> = self
            .results
            .read()
            .await
            .iter()
            .filter(|r| r.record.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));
        Ok(results)
    }

    async fn list_all_results(&self) -> Result<Vec<StoredResult>, AppError> {
        Ok(self.results.read().await.clone())
    }

    async fn upsert_user(&self, user_id: &str, display_name: &str) -> Result<(), AppError> {
        self.users
            .write()
            .await
            .insert(user_id.to_string(), display_name.to_string());
        Ok(())
    }

    async fn display_names(&self) -> Result<HashMap<String, String>, AppError> {
        Ok(self.users.read().await.clone())
    }
}

// src/store/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use super::{ExamStore, in_requested_order};
use crate::{
    error::AppError,
    models::{
        question::{Content, Question, QuestionOption},
        result_record::{ResultRecord, StoredResult},
    },
};

/// Postgres-backed store. Result records live in a JSONB column.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Helper struct for reading the 'questions' table.
#[derive(FromRow)]
struct QuestionRow {
    id: String,
    prompt: Json<Content>,
    options: Json<Vec<QuestionOption>>,
    subject: String,
    chapter: String,
    solution: Json<Content>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            prompt: row.prompt.0,
            options: row.options.0,
            subject: row.subject,
            chapter: row.chapter,
            solution: row.solution.0,
        }
    }
}

/// Helper struct for reading the 'test_results' table.
#[derive(FromRow)]
struct ResultRow {
    id: Uuid,
    record: Json<ResultRecord>,
}

impl From<ResultRow> for StoredResult {
    fn from(row: ResultRow) -> Self {
        Self {
            id: row.id,
            record: row.record.0,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    display_name: String,
}

#[async_trait]
impl ExamStore for PgStore {
    async fn fetch_questions(&self, ids: &[String]) -> Result<Vec<Question>, AppError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT id, prompt, options, subject, chapter, solution
            FROM questions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(in_requested_order(
            ids,
            rows.into_iter().map(Question::from).collect(),
        ))
    }

    async fn insert_result(&self, record: ResultRecord) -> Result<StoredResult, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO test_results (id, user_id, submitted_at, score, record)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&record.user_id)
        .bind(record.timestamp)
        .bind(record.score)
        .bind(Json(&record))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert test result: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(StoredResult { id, record })
    }

    async fn get_result(&self, id: Uuid) -> Result<Option<StoredResult>, AppError> {
        let row: Option<ResultRow> =
            sqlx::query_as("SELECT id, record FROM test_results WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(StoredResult::from))
    }

    async fn list_user_results(&self, user_id: &str) -> Result<Vec<StoredResult>, AppError> {
        let rows: Vec<ResultRow> = sqlx::query_as(
            r#"
            SELECT id, record
            FROM test_results
            WHERE user_id = $1
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredResult::from).collect())
    }

    async fn list_all_results(&self) -> Result<Vec<StoredResult>, AppError> {
        let rows: Vec<ResultRow> = sqlx::query_as("SELECT id, record FROM test_results")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list test results: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(rows.into_iter().map(StoredResult::from).collect())
    }

    async fn upsert_user(&self, user_id: &str, display_name: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn display_names(&self) -> Result<HashMap<String, String>, AppError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT id, display_name FROM users")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|u| (u.id, u.display_name)).collect())
    }
}

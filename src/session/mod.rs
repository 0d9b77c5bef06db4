// src/session/mod.rs

//! In-progress test attempts and their countdowns.

mod countdown;

use std::collections::HashMap;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicI64, Ordering},
};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    engine,
    error::AppError,
    models::{
        attempt::{Attempt, AttemptStatus, TestDefinition},
        question::Question,
        result_record::StoredResult,
        subject::SubjectCatalog,
    },
    store::ExamStore,
};

#[derive(Debug, Clone)]
enum Phase {
    InProgress,
    Submitted(StoredResult),
    Cancelled,
    /// Time ran out and the forced submission could not be saved.
    Expired,
}

/// Who is taking the test.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub user_id: String,
    pub display_name: Option<String>,
}

pub(crate) struct ActiveAttempt {
    id: Uuid,
    candidate: Candidate,
    test: TestDefinition,
    questions: Vec<Question>,
    remaining_secs: AtomicI64,
    closed: AtomicBool,
    /// Held across scoring and persistence so only one submission can win.
    phase: Mutex<Phase>,
    selections: Mutex<HashMap<String, String>>,
}

impl ActiveAttempt {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct RegistryInner {
    attempts: RwLock<HashMap<Uuid, Arc<ActiveAttempt>>>,
    store: Arc<dyn ExamStore>,
    catalog: SubjectCatalog,
    retention: Duration,
}

/// Tracks running attempts.
///
/// * Each attempt gets one countdown task ticking every second.
/// * Submission happens exactly once, whether triggered by the user or the
///   countdown. Later submits return the stored result.
/// * Cancelled attempts never reach scoring or the store.
#[derive(Clone)]
pub struct AttemptRegistry {
    inner: Arc<RegistryInner>,
}

impl AttemptRegistry {
    pub fn new(store: Arc<dyn ExamStore>, catalog: SubjectCatalog, retention: Duration) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                attempts: RwLock::new(HashMap::new()),
                store,
                catalog,
                retention,
            }),
        }
    }

    /// Registers a new attempt and starts its countdown.
    pub async fn start(
        &self,
        candidate: Candidate,
        test: TestDefinition,
        questions: Vec<Question>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let remaining = i64::try_from(test.time_limit_secs).unwrap_or(i64::MAX);

        let attempt = Arc::new(ActiveAttempt {
            id,
            candidate,
            test,
            questions,
            remaining_secs: AtomicI64::new(remaining),
            closed: AtomicBool::new(false),
            phase: Mutex::new(Phase::InProgress),
            selections: Mutex::new(HashMap::new()),
        });

        self.inner
            .attempts
            .write()
            .await
            .insert(id, attempt.clone());

        tracing::info!(
            "Attempt {} started by {} ({} questions, {}s)",
            id,
            attempt.candidate.user_id,
            attempt.questions.len(),
            attempt.test.time_limit_secs
        );

        tokio::spawn(countdown::run(self.clone(), attempt));
        id
    }

    /// Records (or replaces) the selected option for one question.
    pub async fn select(
        &self,
        id: Uuid,
        user_id: &str,
        question_id: &str,
        option_id: &str,
    ) -> Result<(), AppError> {
        let attempt = self.owned(id, user_id).await?;

        let question = attempt
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Question {} is not part of this test", question_id))
            })?;
        if question.option(option_id).is_none() {
            return Err(AppError::BadRequest(format!(
                "Option {} does not belong to question {}",
                option_id, question_id
            )));
        }

        let phase = attempt.phase.lock().await;
        if !matches!(*phase, Phase::InProgress) {
            return Err(AppError::Conflict("Attempt is already closed".to_string()));
        }
        if attempt.remaining_secs.load(Ordering::SeqCst) <= 0 {
            return Err(AppError::Conflict("Time is up for this attempt".to_string()));
        }
        attempt
            .selections
            .lock()
            .await
            .insert(question_id.to_string(), option_id.to_string());

        Ok(())
    }

    pub async fn status(&self, id: Uuid, user_id: &str) -> Result<AttemptStatus, AppError> {
        let attempt = self.owned(id, user_id).await?;
        let submitted = matches!(*attempt.phase.lock().await, Phase::Submitted(_));
        let answered = attempt.selections.lock().await.len();

        Ok(AttemptStatus {
            attempt_id: id,
            remaining_secs: attempt.remaining_secs.load(Ordering::SeqCst).max(0),
            answered,
            total_questions: attempt.questions.len(),
            submitted,
        })
    }

    /// Submits the attempt. Safe to call any number of times.
    pub async fn submit(&self, id: Uuid, user_id: &str) -> Result<StoredResult, AppError> {
        let attempt = self.owned(id, user_id).await?;
        self.finalize(&attempt).await
    }

    /// Discards an attempt that has not been submitted.
    pub async fn cancel(&self, id: Uuid, user_id: &str) -> Result<(), AppError> {
        let attempt = self.owned(id, user_id).await?;

        let mut phase = attempt.phase.lock().await;
        if matches!(*phase, Phase::Submitted(_)) {
            return Err(AppError::Conflict(
                "Attempt has already been submitted".to_string(),
            ));
        }
        *phase = Phase::Cancelled;
        attempt.closed.store(true, Ordering::SeqCst);
        drop(phase);

        self.inner.attempts.write().await.remove(&id);
        tracing::info!("Attempt {} cancelled", id);
        Ok(())
    }

    pub async fn is_active(&self, id: Uuid) -> bool {
        self.inner.attempts.read().await.contains_key(&id)
    }

    async fn owned(&self, id: Uuid, user_id: &str) -> Result<Arc<ActiveAttempt>, AppError> {
        let attempt = self
            .inner
            .attempts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

        if attempt.candidate.user_id != user_id {
            return Err(AppError::Forbidden(
                "Attempt belongs to another user".to_string(),
            ));
        }
        Ok(attempt)
    }

    /// Scores and persists the attempt the first time; afterwards returns the
    /// stored result.
    async fn finalize(&self, attempt: &Arc<ActiveAttempt>) -> Result<StoredResult, AppError> {
        let mut phase = attempt.phase.lock().await;
        match &*phase {
            Phase::Submitted(stored) => return Ok(stored.clone()),
            Phase::Cancelled => return Err(AppError::NotFound("Attempt not found".to_string())),
            Phase::Expired => {
                return Err(AppError::Conflict(
                    "Attempt expired before its result could be saved".to_string(),
                ));
            }
            Phase::InProgress => {}
        }

        let selections = attempt.selections.lock().await.clone();
        let scored = Attempt {
            user_id: attempt.candidate.user_id.clone(),
            test: attempt.test.clone(),
            selections,
            remaining_secs: attempt.remaining_secs.load(Ordering::SeqCst).max(0),
            submitted_at: Utc::now(),
        };
        let record = engine::score(&scored, &attempt.questions, &self.inner.catalog);

        if let Some(name) = &attempt.candidate.display_name {
            if let Err(e) = self.inner.store.upsert_user(&scored.user_id, name).await {
                tracing::warn!("Failed to record display name for {}: {:?}", scored.user_id, e);
            }
        }

        let stored = self.inner.store.insert_result(record).await?;
        tracing::info!(
            "Attempt {} submitted as result {} (score {})",
            attempt.id,
            stored.id,
            stored.record.score
        );

        *phase = Phase::Submitted(stored.clone());
        attempt.closed.store(true, Ordering::SeqCst);
        drop(phase);

        self.evict_later(attempt.id);
        Ok(stored)
    }

    /// Closes an attempt whose forced submission kept failing.
    async fn expire(&self, attempt: &Arc<ActiveAttempt>) {
        let mut phase = attempt.phase.lock().await;
        if !matches!(*phase, Phase::InProgress) {
            return;
        }
        *phase = Phase::Expired;
        attempt.closed.store(true, Ordering::SeqCst);
        drop(phase);

        tracing::error!("Attempt {} expired without a saved result", attempt.id);
        self.evict_later(attempt.id);
    }

    fn evict_later(&self, id: Uuid) {
        let inner = Arc::downgrade(&self.inner);
        let retention = self.inner.retention;
        tokio::spawn(async move {
            tokio::time::sleep(retention).await;
            if let Some(inner) = inner.upgrade() {
                inner.attempts.write().await.remove(&id);
            }
        });
    }
}

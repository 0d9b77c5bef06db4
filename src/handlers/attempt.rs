// src/handlers/attempt.rs

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        attempt::{SelectAnswerRequest, StartAttemptRequest, StartAttemptResponse, TestDefinition},
        question::PublicQuestion,
    },
    session::{AttemptRegistry, Candidate},
    store::ExamStore,
    utils::jwt::Claims,
};

/// Starts a timed test session.
///
/// * Resolves the requested question ids (duplicates dropped, order kept).
/// * Rejects ids the question bank does not know and subjects the catalog does not know.
/// * Returns the questions without correctness flags or solutions.
pub async fn start_attempt(
    State(store): State<Arc<dyn ExamStore>>,
    State(sessions): State<AttemptRegistry>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let mut seen = HashSet::new();
    let ids: Vec<String> = req
        .question_ids
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();

    let questions = store.fetch_questions(&ids).await?;
    if questions.len() != ids.len() {
        let found: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        let missing: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !found.contains(id))
            .collect();
        return Err(AppError::BadRequest(format!(
            "Unknown questions: {}",
            missing.join(", ")
        )));
    }

    if let Some(q) = questions
        .iter()
        .find(|q| !config.subject_catalog.contains(&q.subject))
    {
        return Err(AppError::BadRequest(format!(
            "Question {} has unknown subject {}",
            q.id, q.subject
        )));
    }

    let public: Vec<PublicQuestion> = questions.iter().map(PublicQuestion::from).collect();
    let test = TestDefinition::for_questions(req.test_name.clone(), &questions, req.time_limit_secs);
    let candidate = Candidate {
        user_id: claims.sub,
        display_name: claims.name,
    };

    let attempt_id = sessions.start(candidate, test, questions).await;

    Ok((
        StatusCode::CREATED,
        Json(StartAttemptResponse {
            attempt_id,
            test_name: req.test_name,
            time_limit_secs: req.time_limit_secs,
            questions: public,
        }),
    ))
}

/// Records the user's choice for one question. Choosing again replaces it.
pub async fn select_answer(
    State(sessions): State<AttemptRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    sessions
        .select(id, &claims.sub, &req.question_id, &req.option_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remaining time and progress of a running session.
pub async fn attempt_status(
    State(sessions): State<AttemptRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions.status(id, &claims.sub).await?))
}

/// Submits the attempt. Repeating the call returns the same stored result.
pub async fn submit_attempt(
    State(sessions): State<AttemptRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stored = sessions.submit(id, &claims.sub).await?;
    Ok(Json(stored))
}

/// Discards a session without scoring it.
pub async fn cancel_attempt(
    State(sessions): State<AttemptRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.cancel(id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

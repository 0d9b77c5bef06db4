// src/handlers/analytics.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    config::Config,
    engine,
    error::AppError,
    models::analytics::LeaderboardParams,
    store::ExamStore,
    utils::jwt::Claims,
};

/// Hard cap on leaderboard size a client may ask for.
const MAX_LEADERBOARD_SIZE: usize = 100;

/// The current user's rank across everyone's results.
/// Responds with `null` when the user has no results yet.
pub async fn get_my_rank(
    State(store): State<Arc<dyn ExamStore>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = store.list_all_results().await?;
    let names = store.display_names().await?;

    let entry = engine::rank(results.iter().map(|r| &r.record), &names, &claims.sub);
    Ok(Json(entry))
}

/// Top users by cumulative score.
pub async fn get_leaderboard(
    State(store): State<Arc<dyn ExamStore>>,
    State(config): State<Config>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params
        .limit
        .unwrap_or(config.leaderboard_size)
        .min(MAX_LEADERBOARD_SIZE);

    let results = store.list_all_results().await?;
    let names = store.display_names().await?;

    Ok(Json(engine::leaderboard(
        results.iter().map(|r| &r.record),
        &names,
        limit,
    )))
}

/// Per-subject analytics over the current user's history.
pub async fn get_subject_analytics(
    State(store): State<Arc<dyn ExamStore>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = store.list_user_results(&claims.sub).await?;
    let report = engine::subject_analytics(&results);
    Ok(Json(report))
}

/// The configured subject catalog (id -> display name).
pub async fn list_subjects(State(config): State<Config>) -> impl IntoResponse {
    Json(config.subject_catalog)
}

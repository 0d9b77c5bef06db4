// src/handlers/results.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{error::AppError, store::ExamStore, utils::jwt::Claims};

/// Lists the current user's results, newest first.
pub async fn list_my_results(
    State(store): State<Arc<dyn ExamStore>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = store.list_user_results(&claims.sub).await?;
    Ok(Json(results))
}

/// Fetches one of the current user's results.
pub async fn get_result(
    State(store): State<Arc<dyn ExamStore>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = store
        .get_result(id)
        .await?
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if result.record.user_id != claims.sub {
        return Err(AppError::Forbidden(
            "Result belongs to another user".to_string(),
        ));
    }

    Ok(Json(result))
}

// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{analytics, attempt, results},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (attempts, results, analytics).
/// * Every route sits behind the token check.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let attempt_routes = Router::new()
        .route("/", post(attempt::start_attempt))
        .route(
            "/{id}",
            get(attempt::attempt_status).delete(attempt::cancel_attempt),
        )
        .route("/{id}/answers", put(attempt::select_answer))
        .route("/{id}/submit", post(attempt::submit_attempt));

    let result_routes = Router::new()
        .route("/", get(results::list_my_results))
        .route("/{id}", get(results::get_result));

    let analytics_routes = Router::new()
        .route("/rank", get(analytics::get_my_rank))
        .route("/leaderboard", get(analytics::get_leaderboard))
        .route("/subjects", get(analytics::get_subject_analytics));

    let api = Router::new()
        .nest("/attempts", attempt_routes)
        .nest("/results", result_routes)
        .nest("/analytics", analytics_routes)
        .route("/subjects", get(analytics::list_subjects))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", api)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

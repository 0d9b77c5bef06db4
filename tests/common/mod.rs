// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use exam_prep::{
    config::Config,
    models::{
        question::{Content, Question, QuestionOption},
        subject::SubjectCatalog,
    },
    routes,
    state::AppState,
    store::MemoryStore,
    utils::jwt::Claims,
};
use jsonwebtoken::{EncodingKey, Header, encode};

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
}

/// Builds a question whose option `"{id}-{i}"` is correct when `correct[i]` is true.
pub fn question(id: &str, subject: &str, chapter: &str, correct: &[bool]) -> Question {
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
        solution: Content::text("Because."),
    }
}

/// Signs a token the way the identity provider would.
pub fn token_for(user_id: &str, name: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        name: Some(name.to_string()),
        exp: 4_000_000_000,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Spawns the app on a random port, backed by an in-memory store.
pub async fn spawn_app(questions: Vec<Question>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store.add_questions(questions).await;

    let config = Config {
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        subject_catalog: SubjectCatalog::default(),
        leaderboard_size: 10,
        submitted_retention_secs: 600,
    };

    let state = AppState::new(store.clone(), config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, store }
}

// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, session::AttemptRegistry, store::ExamStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExamStore>,
    pub sessions: AttemptRegistry,
    pub config: Config,
}

impl AppState {
    /// Wires the attempt registry to the same store and subject catalog.
    pub fn new(store: Arc<dyn ExamStore>, config: Config) -> Self {
        let sessions = AttemptRegistry::new(
            store.clone(),
            config.subject_catalog.clone(),
            std::time::Duration::from_secs(config.submitted_retention_secs),
        );
        Self {
            store,
            sessions,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn ExamStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for AttemptRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

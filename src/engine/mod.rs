// src/engine/mod.rs

//! Pure scoring and aggregation. Nothing in here performs I/O.

pub mod analytics;
pub mod rank;
pub mod scoring;
pub mod validation;

pub use analytics::subject_analytics;
pub use rank::{leaderboard, rank};
pub use scoring::score;

// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

use crate::models::subject::SubjectCatalog;

/// Default number of entries on the leaderboard.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// How long a submitted attempt stays around so repeat submits return the same result.
pub const DEFAULT_SUBMITTED_RETENTION_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it the service keeps everything in memory.
    pub database_url: Option<String>,
    /// Shared secret of the identity provider's HS256 tokens.
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub subject_catalog: SubjectCatalog,
    pub leaderboard_size: usize,
    pub submitted_retention_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address");

        let subject_catalog = match env::var("SUBJECT_CATALOG") {
            Ok(raw) => {
                let catalog: SubjectCatalog = serde_json::from_str(&raw)
                    .expect("SUBJECT_CATALOG must be a JSON object of subject id to name");
                assert!(!catalog.is_empty(), "SUBJECT_CATALOG must not be empty");
                catalog
            }
            Err(_) => SubjectCatalog::default(),
        };

        let leaderboard_size = env::var("LEADERBOARD_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LEADERBOARD_SIZE);

        let submitted_retention_secs = env::var("SUBMITTED_RETENTION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUBMITTED_RETENTION_SECS);

        Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            subject_catalog,
            leaderboard_size,
            submitted_retention_secs,
        }
    }
}

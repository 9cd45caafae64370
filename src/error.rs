//! Error types
//!
//! Nothing inside the simulation fails; errors only come from the
//! leaderboard boundary and from loading configuration files.

use thiserror::Error;

/// Failure talking to a leaderboard collaborator
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Leaderboard API returned status {0}")]
    Status(u16),

    #[error("Malformed leaderboard payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Leaderboard storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Leaderboard worker is no longer running")]
    WorkerGone,
}

/// Failure loading a tuning or settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

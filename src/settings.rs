//! Runtime settings
//!
//! Read from the environment at start-up. Invalid values are logged and
//! replaced by defaults; a missing leaderboard configuration just disables
//! the leaderboard.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_SIZE;
use crate::leaderboard::{FileLeaderboard, LeaderboardLink, MemoryLeaderboard, RestLeaderboard};
use crate::tuning::Tuning;

/// Where scores go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LeaderboardBackend {
    /// No leaderboard: game over always restarts
    #[default]
    Disabled,
    /// Scores kept for this process only
    Memory,
    /// Scores kept in a local JSON file
    File(PathBuf),
    /// Hosted scores API
    Rest { endpoint: String, api_key: String },
}

impl LeaderboardBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardBackend::Disabled => "disabled",
            LeaderboardBackend::Memory => "memory",
            LeaderboardBackend::File(_) => "file",
            LeaderboardBackend::Rest { .. } => "rest",
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Leaderboard collaborator
    pub leaderboard: LeaderboardBackend,
    /// Entries fetched for the standings screen
    pub leaderboard_size: usize,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
    /// Tuning file to load instead of the defaults
    pub tuning_path: Option<PathBuf>,
    /// Ticks the headless demo runs for
    pub demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leaderboard: LeaderboardBackend::Disabled,
            leaderboard_size: LEADERBOARD_SIZE,
            seed: None,
            tuning_path: None,
            demo_ticks: 60 * 60,
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn load_or_default() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    ///
    /// - `LEADERBOARD_API_ENDPOINT` + `LEADERBOARD_API_KEY`: hosted API
    /// - `BOUNCE_LEADERBOARD_FILE`: local JSON file
    /// - `BOUNCE_LEADERBOARD=memory`: in-process board
    /// - `BOUNCE_LEADERBOARD_SIZE`, `BOUNCE_SEED`, `BOUNCE_TUNING`, `BOUNCE_DEMO_TICKS`
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        let endpoint = var("LEADERBOARD_API_ENDPOINT").filter(|s| !s.trim().is_empty());
        let api_key = var("LEADERBOARD_API_KEY").filter(|s| !s.trim().is_empty());
        settings.leaderboard = match (endpoint, api_key) {
            (Some(endpoint), Some(api_key)) => LeaderboardBackend::Rest { endpoint, api_key },
            (Some(_), None) | (None, Some(_)) => {
                log::warn!("API endpoint or API key not set. Leaderboard functionality will be disabled.");
                LeaderboardBackend::Disabled
            }
            (None, None) => {
                if let Some(path) = var("BOUNCE_LEADERBOARD_FILE").filter(|s| !s.trim().is_empty()) {
                    LeaderboardBackend::File(PathBuf::from(path))
                } else if var("BOUNCE_LEADERBOARD").is_some_and(|s| s.eq_ignore_ascii_case("memory")) {
                    LeaderboardBackend::Memory
                } else {
                    LeaderboardBackend::Disabled
                }
            }
        };

        if let Some(size) = var("BOUNCE_LEADERBOARD_SIZE") {
            match size.parse::<usize>() {
                Ok(parsed) if parsed > 0 && parsed <= 100 => settings.leaderboard_size = parsed,
                _ => log::warn!("BOUNCE_LEADERBOARD_SIZE must be 1-100, got '{}', using default", size),
            }
        }

        if let Some(seed) = var("BOUNCE_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => settings.seed = Some(parsed),
                Err(_) => log::warn!("Invalid BOUNCE_SEED '{}', seeding from the clock", seed),
            }
        }

        if let Some(ticks) = var("BOUNCE_DEMO_TICKS") {
            match ticks.parse::<u64>() {
                Ok(parsed) if parsed > 0 => settings.demo_ticks = parsed,
                _ => log::warn!("Invalid BOUNCE_DEMO_TICKS '{}', using default", ticks),
            }
        }

        settings.tuning_path = var("BOUNCE_TUNING").map(PathBuf::from);

        settings
    }

    /// Tuning from the configured file, or the defaults if that fails
    pub fn load_tuning(&self) -> Tuning {
        match &self.tuning_path {
            Some(path) => Tuning::load(path).unwrap_or_else(|e| {
                log::warn!("{}; using default tuning", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    /// Connect the configured leaderboard
    ///
    /// Returns None (leaderboard-disabled mode) when none is configured or it
    /// can't be set up.
    pub fn connect_leaderboard(&self) -> Option<LeaderboardLink> {
        let size = self.leaderboard_size;
        let link = match &self.leaderboard {
            LeaderboardBackend::Disabled => {
                log::info!("Leaderboard disabled");
                return None;
            }
            LeaderboardBackend::Memory => Ok(LeaderboardLink::inline(MemoryLeaderboard::new(), size)),
            LeaderboardBackend::File(path) => {
                FileLeaderboard::open(path.clone()).map(|board| LeaderboardLink::inline(board, size))
            }
            LeaderboardBackend::Rest { endpoint, api_key } => RestLeaderboard::new(endpoint.as_str(), api_key.as_str())
                .and_then(|board| LeaderboardLink::spawn(board, size)),
        };

        match link {
            Ok(link) => {
                log::info!("Leaderboard enabled ({})", self.leaderboard.as_str());
                Some(link)
            }
            Err(e) => {
                log::warn!("Error initializing leaderboard: {}. Leaderboard functionality will be disabled.", e);
                None
            }
        }
    }
}

//! Leaderboard collaborators
//!
//! The session only ever needs two operations: submit a named score and
//! fetch the top N entries, highest first. Backends:
//! - `memory`: in-process ranked list (tests, offline play)
//! - `local`: the same list persisted to a JSON file
//! - `rest`: HTTP client for the hosted scores API
//!
//! Blocking backends go behind a [`LeaderboardWorker`] so the simulation
//! tick never waits on the network; results come back as events.

pub mod local;
pub mod memory;
pub mod rest;
pub mod worker;

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LeaderboardError;

pub use local::FileLeaderboard;
pub use memory::MemoryLeaderboard;
pub use rest::RestLeaderboard;
pub use worker::LeaderboardWorker;

/// A single ranked score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Opaque identifier assigned by the store
    #[serde(default)]
    pub player_id: String,
    pub player_name: String,
    #[serde(deserialize_with = "score_from_any")]
    pub score: u64,
    /// When the score was recorded (UTC)
    #[serde(default, deserialize_with = "timestamp_from_any")]
    pub timestamp: Option<NaiveDateTime>,
}

impl LeaderboardEntry {
    /// New entry stamped with a fresh id and the current time
    pub fn new(player_name: impl Into<String>, score: u64) -> Self {
        Self {
            player_id: uuid::Uuid::new_v4().to_string(),
            player_name: player_name.into(),
            score,
            timestamp: Some(Utc::now().naive_utc()),
        }
    }
}

/// Sort highest score first (stable, so earlier entries win ties)
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Ranked score storage
pub trait Leaderboard: Send {
    /// Record a score
    fn submit(&mut self, player_name: &str, score: u64) -> Result<(), LeaderboardError>;

    /// Up to `limit` entries, highest score first
    fn fetch_top(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Short backend name for logs
    fn kind(&self) -> &'static str;
}

/// Outcome of a submit-then-fetch round trip
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardEvent {
    /// Score stored; these are the current standings
    Ranked(Vec<LeaderboardEntry>),
    /// Something failed; the pending score is dropped
    Failed(String),
}

/// Submit a score, then fetch the standings. Failures are logged here.
pub fn submit_and_fetch(
    board: &mut dyn Leaderboard,
    player_name: &str,
    score: u64,
    limit: usize,
) -> LeaderboardEvent {
    if let Err(e) = board.submit(player_name, score) {
        log::warn!("{} leaderboard: failed to submit {} for {}: {}", board.kind(), score, player_name, e);
        return LeaderboardEvent::Failed(e.to_string());
    }
    log::info!("{} leaderboard: submitted {} for {}", board.kind(), score, player_name);

    match board.fetch_top(limit) {
        Ok(mut entries) => {
            rank(&mut entries);
            entries.truncate(limit);
            LeaderboardEvent::Ranked(entries)
        }
        Err(e) => {
            log::warn!("{} leaderboard: failed to fetch top {}: {}", board.kind(), limit, e);
            LeaderboardEvent::Failed(e.to_string())
        }
    }
}

enum Backend {
    /// Runs on the caller's thread
    Inline(Box<dyn Leaderboard>),
    /// Runs on a background thread
    Worker(LeaderboardWorker),
}

/// The session's handle on a leaderboard
///
/// Requests are fire-and-forget; the outcome is picked up with [`poll`]
/// on a later tick (the same tick for inline backends). Each request is
/// numbered and only the reply to the latest one is delivered, so a reply
/// to an abandoned submit never surfaces as a later game's standings.
///
/// [`poll`]: LeaderboardLink::poll
pub struct LeaderboardLink {
    backend: Backend,
    ready: VecDeque<(u64, LeaderboardEvent)>,
    limit: usize,
    next_seq: u64,
    /// Sequence number of the request still awaiting a reply
    pending: Option<u64>,
}

impl LeaderboardLink {
    fn with_backend(backend: Backend, limit: usize) -> Self {
        Self {
            backend,
            ready: VecDeque::new(),
            limit,
            next_seq: 0,
            pending: None,
        }
    }

    /// Run `board` synchronously inside `request`
    pub fn inline(board: impl Leaderboard + 'static, limit: usize) -> Self {
        Self::with_backend(Backend::Inline(Box::new(board)), limit)
    }

    /// Run `board` on its own thread
    pub fn spawn(board: impl Leaderboard + 'static, limit: usize) -> Result<Self, LeaderboardError> {
        let worker = LeaderboardWorker::spawn(Box::new(board), limit)?;
        Ok(Self::with_backend(Backend::Worker(worker), limit))
    }

    /// Number of entries fetched after a submit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// A request is waiting for its reply
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a submit-then-fetch round trip. Supersedes any request still
    /// in flight.
    pub fn request(&mut self, player_name: &str, score: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending = Some(seq);

        match &mut self.backend {
            Backend::Inline(board) => {
                let event = submit_and_fetch(board.as_mut(), player_name, score, self.limit);
                self.ready.push_back((seq, event));
            }
            Backend::Worker(worker) => {
                if let Err(e) = worker.request(seq, player_name, score) {
                    log::warn!("Leaderboard request not sent: {}", e);
                    self.ready.push_back((seq, LeaderboardEvent::Failed(e.to_string())));
                }
            }
        }
    }

    /// Forget the request in flight; its reply will be dropped on arrival
    pub fn discard_pending(&mut self) {
        if let Some(seq) = self.pending.take() {
            log::debug!("Abandoned leaderboard request #{}", seq);
        }
    }

    /// Reply to the pending request, if it has arrived
    pub fn poll(&mut self) -> Option<LeaderboardEvent> {
        loop {
            let (seq, event) = match self.ready.pop_front() {
                Some(reply) => reply,
                None => match &self.backend {
                    Backend::Inline(_) => return None,
                    Backend::Worker(worker) => match worker.try_recv() {
                        Ok(Some(reply)) => reply,
                        Ok(None) => return None,
                        Err(e) => {
                            // Only worth reporting while someone is waiting
                            return self.pending.take().map(|_| LeaderboardEvent::Failed(e.to_string()));
                        }
                    },
                },
            };

            if self.pending == Some(seq) {
                self.pending = None;
                return Some(event);
            }
            log::debug!("Dropping stale leaderboard reply #{}", seq);
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Int(u64),
    Float(f64),
    Text(String),
}

/// Scores arrive as integers, floats (DynamoDB decimals) or numeric strings
fn score_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawScore::deserialize(deserializer)?;
    let value = match raw {
        RawScore::Int(n) => return Ok(n),
        RawScore::Float(f) => f,
        RawScore::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom)?,
    };
    Ok(value.max(0.0).round() as u64)
}

/// Naive ISO-8601 (as written by the scores API) or RFC 3339; anything else is dropped
fn timestamp_from_any<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        s.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.naive_utc()))
    }))
}

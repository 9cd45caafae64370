//! Background leaderboard worker
//!
//! Owns a blocking leaderboard on its own thread. The session sends
//! submit requests over a channel and polls for results once per tick, so a
//! slow network never stalls the simulation.

use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use super::{Leaderboard, LeaderboardEvent, submit_and_fetch};
use crate::error::LeaderboardError;

/// Score waiting to be submitted
#[derive(Debug, Clone)]
struct SubmitRequest {
    seq: u64,
    player_name: String,
    score: u64,
}

/// Outcome of a request, tagged with the request's sequence number
pub type Reply = (u64, LeaderboardEvent);

/// Handle on the worker thread
pub struct LeaderboardWorker {
    requests: Sender<SubmitRequest>,
    events: Receiver<Reply>,
}

impl LeaderboardWorker {
    /// Move `board` onto a new thread. Each request is answered with one reply
    /// carrying its sequence number and the top `limit` entries.
    pub fn spawn(mut board: Box<dyn Leaderboard>, limit: usize) -> Result<Self, LeaderboardError> {
        let (request_tx, request_rx) = unbounded::<SubmitRequest>();
        let (event_tx, event_rx) = unbounded();

        thread::Builder::new()
            .name("leaderboard".to_string())
            .spawn(move || {
                log::debug!("Leaderboard worker started ({})", board.kind());
                // Ends when the session drops its sender
                for request in request_rx {
                    let event = submit_and_fetch(board.as_mut(), &request.player_name, request.score, limit);
                    if event_tx.send((request.seq, event)).is_err() {
                        break;
                    }
                }
                log::debug!("Leaderboard worker stopped");
            })?;

        Ok(Self {
            requests: request_tx,
            events: event_rx,
        })
    }

    /// Queue a submit-then-fetch round trip numbered `seq`
    pub fn request(&self, seq: u64, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        self.requests
            .send(SubmitRequest {
                seq,
                player_name: player_name.to_string(),
                score,
            })
            .map_err(|_| LeaderboardError::WorkerGone)
    }

    /// Non-blocking check for a finished round trip
    pub fn try_recv(&self) -> Result<Option<Reply>, LeaderboardError> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(LeaderboardError::WorkerGone),
        }
    }
}

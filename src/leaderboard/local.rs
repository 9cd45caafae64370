//! File-backed leaderboard
//!
//! Persisted as JSON next to the game, keeps the top 10 scores.

use std::path::{Path, PathBuf};

use super::memory::MemoryLeaderboard;
use super::{Leaderboard, LeaderboardEntry};
use crate::consts::LEADERBOARD_SIZE;
use crate::error::LeaderboardError;

/// Leaderboard stored in a local JSON file
#[derive(Debug)]
pub struct FileLeaderboard {
    path: PathBuf,
    board: MemoryLeaderboard,
}

impl FileLeaderboard {
    /// Open (or start) the leaderboard at `path`
    ///
    /// A missing file starts empty. A corrupt file is logged and replaced on
    /// the next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();
        let mut board = MemoryLeaderboard::with_capacity(LEADERBOARD_SIZE);

        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
                Ok(entries) => {
                    log::info!("Loaded {} high scores from {}", entries.len(), path.display());
                    for entry in entries {
                        board.insert(entry);
                    }
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt leaderboard {}: {}", path.display(), e);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self { path, board })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.board.entries
    }

    /// Write the current entries out
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(&self.board.entries)?;
        std::fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", self.board.len());
        Ok(())
    }
}

impl Leaderboard for FileLeaderboard {
    fn submit(&mut self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        if self.board.insert(LeaderboardEntry::new(player_name, score)).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn fetch_top(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.board.fetch_top(limit)
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut board = FileLeaderboard::open(&path).unwrap();
        assert!(board.entries().is_empty());
        board.submit("Ada", 150).unwrap();
        board.submit("Bob", 300).unwrap();

        let mut reopened = FileLeaderboard::open(&path).unwrap();
        let top = reopened.fetch_top(10).unwrap();
        let names: Vec<_> = top.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ada"]);
        assert_eq!(top[0].player_id, board.entries()[0].player_id);
    }

    #[test]
    fn test_keeps_only_top_ten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut board = FileLeaderboard::open(&path).unwrap();
        for score in 1..=15 {
            board.submit("p", score * 10).unwrap();
        }
        let reopened = FileLeaderboard::open(&path).unwrap();
        assert_eq!(reopened.entries().len(), LEADERBOARD_SIZE);
        assert_eq!(reopened.entries()[0].score, 150);
        assert_eq!(reopened.entries()[9].score, 60);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut board = FileLeaderboard::open(&path).unwrap();
        assert!(board.entries().is_empty());
        board.submit("Ada", 10).unwrap();
        assert_eq!(FileLeaderboard::open(&path).unwrap().entries().len(), 1);
    }
}

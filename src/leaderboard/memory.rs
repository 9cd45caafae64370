//! In-memory leaderboard
//!
//! Entries are kept sorted descending by score. Used directly for offline
//! play and tests, and as the storage behind the file-backed board.

use serde::{Deserialize, Serialize};

use super::{Leaderboard, LeaderboardEntry};
use crate::error::LeaderboardError;

/// Ranked list of scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// Maximum entries kept (None = unbounded)
    #[serde(default)]
    pub capacity: Option<usize>,
}

impl MemoryLeaderboard {
    /// Empty, unbounded leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty leaderboard that keeps only the best `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Pre-seeded leaderboard (entries are ranked on the way in)
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        super::rank(&mut entries);
        Self {
            entries,
            capacity: None,
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        match self.capacity {
            Some(cap) if self.entries.len() >= cap => {
                // Has to beat the lowest entry
                self.entries.last().map(|e| score > e.score).unwrap_or(true)
            }
            _ => true,
        }
    }

    /// Insert an entry at its rank. Returns the rank (1-indexed) or None if it
    /// didn't make the board.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Find insertion point (sorted descending; ties rank after older entries)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        if let Some(cap) = self.capacity {
            self.entries.truncate(cap);
        }

        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn submit(&mut self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        // A score that misses a full board is still a successful submit
        self.insert(LeaderboardEntry::new(player_name, score));
        Ok(())
    }

    fn fetch_top(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryLeaderboard {
        MemoryLeaderboard::from_entries(vec![
            LeaderboardEntry::new("Grace", 90),
            LeaderboardEntry::new("Linus", 300),
            LeaderboardEntry::new("Ken", 120),
        ])
    }

    #[test]
    fn test_insert_returns_rank() {
        let mut board = seeded();
        assert_eq!(board.insert(LeaderboardEntry::new("Ada", 150)), Some(2));
        assert_eq!(board.insert(LeaderboardEntry::new("Tie", 150)), Some(3));
        assert_eq!(board.insert(LeaderboardEntry::new("Last", 1)), Some(6));
        assert_eq!(board.top_score(), Some(300));
        assert_eq!(board.len(), 6);
    }

    #[test]
    fn test_capacity_trims_and_rejects() {
        let mut board = MemoryLeaderboard::with_capacity(2);
        assert_eq!(board.insert(LeaderboardEntry::new("a", 10)), Some(1));
        assert_eq!(board.insert(LeaderboardEntry::new("b", 20)), Some(1));
        // Full: must beat the lowest
        assert!(!board.qualifies(10));
        assert_eq!(board.insert(LeaderboardEntry::new("c", 5)), None);
        assert_eq!(board.insert(LeaderboardEntry::new("d", 15)), Some(2));
        let scores: Vec<_> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![20, 15]);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut board = MemoryLeaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.insert(LeaderboardEntry::new("zero", 0)), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_fetch_top_limits() {
        let mut board = seeded();
        let top = board.fetch_top(2).unwrap();
        let names: Vec<_> = top.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Linus", "Ken"]);
        assert_eq!(board.fetch_top(10).unwrap().len(), 3);
    }
}

//! In-memory ranking of finished spectator games.

use chrono::{DateTime, Local};
use snake_common::PlayerId;
use snake_common::games::snake::{GameMode, GameResult};

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub score: u32,
    pub mode: GameMode,
    pub ticks: u64,
    pub timestamp: DateTime<Local>,
}

/// Top-N results sorted by score, highest first.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    capacity: usize,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn qualifies(&self, score: u32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        self.entries.last().is_none_or(|lowest| score > lowest.score)
    }

    /// Records a finished game. Returns the 1-based rank, or `None` if the
    /// score did not make the board. Equal scores keep earlier entries ahead.
    pub fn submit(&mut self, result: &GameResult, timestamp: DateTime<Local>) -> Option<usize> {
        if !self.qualifies(result.score) {
            return None;
        }

        let entry = LeaderboardEntry {
            player_id: result.player_id.clone(),
            score: result.score,
            mode: result.mode,
            ticks: result.ticks,
            timestamp,
        };

        let index = self
            .entries
            .iter()
            .position(|existing| result.score > existing.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        self.entries.truncate(self.capacity);

        Some(index + 1)
    }
}

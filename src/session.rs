use std::fmt;

use chrono::{DateTime, Local};

use crate::difficulty::Difficulty;

/// Record of one won round
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub difficulty: Difficulty,
    pub target: u32,
    pub attempts: u32,
    pub points: u32,
    pub streak: u32,
    pub completed_at: DateTime<Local>,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {}, Target: {}, Attempts: {}, Points: {}, Streak: {}",
            self.difficulty, self.target, self.attempts, self.points, self.streak
        )
    }
}

/// Lives for the whole process; survives every round restart
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub score: u32,
    pub streak: u32,
    history: Vec<HistoryEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Credits a won round and appends it to the history.
    pub fn record_win(
        &mut self,
        difficulty: Difficulty,
        target: u32,
        attempts: u32,
        points: u32,
    ) -> &HistoryEntry {
        self.score = self.score.saturating_add(points);
        self.streak += 1;
        self.history.push(HistoryEntry {
            difficulty,
            target,
            attempts,
            points,
            streak: self.streak,
            completed_at: Local::now(),
        });
        // just pushed
        &self.history[self.history.len() - 1]
    }

    pub fn break_streak(&mut self) {
        self.streak = 0;
    }
}

//! Best score tracking
//!
//! Lives in memory for the process lifetime; nothing is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    best: u32,
    last: Option<u32>,
    rounds_played: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round. Returns true if it set a new best.
    pub fn record_round(&mut self, score: u32) -> bool {
        self.last = Some(score);
        self.rounds_played += 1;
        if score > self.best {
            self.best = score;
            return true;
        }
        false
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Score of the most recently finished round
    pub fn last(&self) -> Option<u32> {
        self.last
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }
}

use std::fmt;

use crate::difficulty::Difficulty;

/// Seconds on the countdown when a round starts
pub const ROUND_SECS: u32 = 30;

/// Identity of one round; a fresh id is issued every time a round starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoundId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// accepting guesses, countdown running
    Active,
    /// target hit, waiting for the scheduled restart
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    TooLow,
    TooHigh,
    Correct {
        attempts: u32,
    },
    TimeUp,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        matches!(self, Feedback::None)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::None => Ok(()),
            Feedback::TooLow => write!(f, "Too low! 💪"),
            Feedback::TooHigh => write!(f, "Too high! 🔥"),
            Feedback::Correct { attempts: 1 } => {
                write!(f, "Correct! 🎉 You hit the target in 1 attempt")
            }
            Feedback::Correct { attempts } => {
                write!(f, "Correct! 🎉 You hit the target in {attempts} attempts")
            }
            Feedback::TimeUp => write!(f, "Time's up! ⏰"),
        }
    }
}

/// The live round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub id: RoundId,
    pub difficulty: Difficulty,
    pub(crate) target: u32,
    pub attempts: u32,
    pub seconds_remaining: u32,
    pub feedback: Feedback,
    pub phase: Phase,
}

impl RoundState {
    pub fn new(id: RoundId, difficulty: Difficulty, target: u32, feedback: Feedback) -> Self {
        Self {
            id,
            difficulty,
            target,
            attempts: 0,
            seconds_remaining: ROUND_SECS,
            feedback,
            phase: Phase::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }
}

/// Points for a hit: fewer attempts and more time left score higher, never below 1.
///
/// `attempts` counts the winning guess.
pub fn points_for(attempts: u32, seconds_remaining: u32) -> u32 {
    let raw = 10 - i64::from(attempts) + i64::from(seconds_remaining / 5);
    raw.max(1) as u32
}

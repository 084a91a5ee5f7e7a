//! The round state machine.
//!
//! [`RoundEngine`] owns the live round and the session totals and is the only
//! thing that mutates them. Hosts feed it discrete commands (difficulty
//! picks, guesses, resets), one [`RoundEngine::tick`] per elapsed second, and
//! wall-clock deltas through [`RoundEngine::advance`] so the delayed restart
//! after a hit can fire. After any command, [`RoundEngine::snapshot`] returns
//! everything a renderer is allowed to show.

use std::time::Duration;

use rand::{rngs::ThreadRng, Rng};
use tracing::{debug, info, warn};

use crate::{
    cue::Cue,
    difficulty::Difficulty,
    error::GuessError,
    round::{points_for, Feedback, Phase, RoundId, RoundState},
    session::{HistoryEntry, SessionState},
};

/// Pause between a hit and the next round
pub const RESTART_DELAY: Duration = Duration::from_secs(1);

const MAX_INPUT_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Hit { points: u32 },
    /// The round is already won and waiting for its restart.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(u32),
    TimedOut,
    /// Countdown is frozen while a won round waits for its restart.
    Paused,
}

#[derive(Debug, Clone, Copy)]
struct PendingRestart {
    round: RoundId,
    remaining: Duration,
}

/// Everything the renderer may display. Never carries the target.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub difficulty: Difficulty,
    pub bounds: (u32, u32),
    pub attempts: u32,
    pub score: u32,
    pub streak: u32,
    pub seconds_remaining: u32,
    pub feedback: &'a Feedback,
    pub phase: Phase,
    pub cue: Cue,
    pub input: &'a str,
    pub history: &'a [HistoryEntry],
}

#[derive(Debug)]
pub struct RoundEngine<R = ThreadRng> {
    rng: R,
    round: RoundState,
    session: SessionState,
    cue: Cue,
    input: String,
    pending_restart: Option<PendingRestart>,
    next_round: u64,
}

impl RoundEngine<ThreadRng> {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(rand::thread_rng(), difficulty)
    }
}

impl<R: Rng> RoundEngine<R> {
    pub fn with_rng(mut rng: R, difficulty: Difficulty) -> Self {
        let target = difficulty.draw_target(&mut rng);
        let round = RoundState::new(RoundId(0), difficulty, target, Feedback::None);
        debug!(round = round.id.0, %difficulty, "first round");

        Self {
            rng,
            round,
            session: SessionState::new(),
            cue: Cue::Neutral,
            input: String::new(),
            pending_restart: None,
            next_round: 1,
        }
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn difficulty(&self) -> Difficulty {
        self.round.difficulty
    }

    /// The hidden number. Not part of the snapshot; renderers must not show it.
    pub fn target(&self) -> u32 {
        self.round.target
    }

    pub fn cue(&self) -> Cue {
        self.cue
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_pending_restart(&self) -> bool {
        self.pending_restart.is_some()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            difficulty: self.round.difficulty,
            bounds: self.round.difficulty.bounds(),
            attempts: self.round.attempts,
            score: self.session.score,
            streak: self.session.streak,
            seconds_remaining: self.round.seconds_remaining,
            feedback: &self.round.feedback,
            phase: self.round.phase,
            cue: self.cue,
            input: &self.input,
            history: self.session.history(),
        }
    }

    /// Replaces the live round. Any restart scheduled for the old round is
    /// dropped with it.
    fn start_round(&mut self, difficulty: Difficulty, feedback: Feedback) {
        let id = RoundId(self.next_round);
        self.next_round += 1;

        let target = difficulty.draw_target(&mut self.rng);
        self.round = RoundState::new(id, difficulty, target, feedback);
        self.cue = Cue::Neutral;
        self.input.clear();
        if let Some(pending) = self.pending_restart.take() {
            debug!(round = pending.round.0, "cancelled scheduled restart");
        }

        debug!(round = id.0, %difficulty, "round started");
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        info!(from = %self.round.difficulty, to = %difficulty, "difficulty selected");
        self.start_round(difficulty, Feedback::None);
    }

    /// Starts over under `new_level`, or under the current difficulty.
    pub fn reset_game(&mut self, new_level: Option<Difficulty>) {
        let difficulty = new_level.unwrap_or(self.round.difficulty);
        self.start_round(difficulty, Feedback::None);
    }

    /// Appends to the guess buffer. Only characters that can appear in a
    /// number are taken.
    pub fn push_char(&mut self, c: char) -> bool {
        let accepted = (c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
            && self.input.len() < MAX_INPUT_LEN;
        if accepted {
            self.input.push(c);
        }
        accepted
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Submits the buffered input.
    pub fn submit(&mut self) -> Result<GuessOutcome, GuessError> {
        let raw = std::mem::take(&mut self.input);
        self.submit_guess(&raw)
    }

    /// Evaluates one guess against the target. The input buffer is empty
    /// afterwards whatever the outcome. Unparseable input is rejected even
    /// after a win; a valid guess is ignored until the next round starts.
    pub fn submit_guess(&mut self, raw: &str) -> Result<GuessOutcome, GuessError> {
        self.input.clear();
        let guess = parse_guess(raw)?;

        if !self.round.is_active() {
            debug!(round = self.round.id.0, "guess ignored, round already won");
            return Ok(GuessOutcome::Ignored);
        }

        self.round.attempts += 1;
        let target = f64::from(self.round.target);

        if guess < target {
            self.round.feedback = Feedback::TooLow;
            self.cue = Cue::Incorrect;
            return Ok(GuessOutcome::TooLow);
        }
        if guess > target {
            self.round.feedback = Feedback::TooHigh;
            self.cue = Cue::Incorrect;
            return Ok(GuessOutcome::TooHigh);
        }

        let attempts = self.round.attempts;
        let points = points_for(attempts, self.round.seconds_remaining);
        let entry = self
            .session
            .record_win(self.round.difficulty, self.round.target, attempts, points);
        info!(
            round = self.round.id.0,
            difficulty = %entry.difficulty,
            target = entry.target,
            attempts,
            points,
            streak = entry.streak,
            "target hit"
        );

        self.round.feedback = Feedback::Correct { attempts };
        self.round.phase = Phase::Resolved;
        self.cue = Cue::Correct;
        self.pending_restart = Some(PendingRestart {
            round: self.round.id,
            remaining: RESTART_DELAY,
        });

        Ok(GuessOutcome::Hit { points })
    }

    /// One second of countdown.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.round.is_active() {
            return TickOutcome::Paused;
        }

        self.round.seconds_remaining = self.round.seconds_remaining.saturating_sub(1);
        if self.round.seconds_remaining > 0 {
            return TickOutcome::Counting(self.round.seconds_remaining);
        }

        info!(
            round = self.round.id.0,
            attempts = self.round.attempts,
            streak = self.session.streak,
            "time's up"
        );
        self.session.break_streak();
        self.start_round(self.round.difficulty, Feedback::TimeUp);
        TickOutcome::TimedOut
    }

    /// Feeds elapsed wall time to the scheduled restart. Returns true when a
    /// new round was started.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(pending) = self.pending_restart.as_mut() else {
            return false;
        };

        pending.remaining = pending.remaining.saturating_sub(dt);
        if !pending.remaining.is_zero() {
            return false;
        }

        let pending = *pending;
        self.pending_restart = None;

        // a restart only ever applies to the round that scheduled it
        if pending.round != self.round.id {
            warn!(
                scheduled_for = pending.round.0,
                current = self.round.id.0,
                "discarding stale restart"
            );
            return false;
        }

        self.start_round(self.round.difficulty, Feedback::None);
        true
    }
}

/// A guess must read as a finite, nonzero number. Zero is refused along with
/// empty input.
fn parse_guess(raw: &str) -> Result<f64, GuessError> {
    let invalid = || GuessError::InvalidInput {
        input: raw.to_string(),
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value == 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

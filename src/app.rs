use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::ThreadRng, Rng};
use tracing::warn;

use crate::{
    config::Config,
    cue::CueFade,
    difficulty::Difficulty,
    engine::{RoundEngine, TickOutcome},
    round::RoundId,
    runtime::CountdownClock,
};

/// Blocking message box; the next key press only dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

impl Alert {
    pub fn invalid_guess() -> Self {
        Self {
            title: "Invalid guess",
            message: "Enter a number!",
        }
    }
}

/// Binds terminal input and elapsed time to the round engine
#[derive(Debug)]
pub struct App<R = ThreadRng> {
    pub engine: RoundEngine<R>,
    pub fade: CueFade,
    pub alert: Option<Alert>,
    clock: CountdownClock,
    seen_round: RoundId,
    should_quit: bool,
}

impl App<ThreadRng> {
    pub fn new(config: &Config) -> Self {
        Self::with_engine(RoundEngine::new(config.difficulty))
    }
}

impl<R: Rng> App<R> {
    pub fn with_engine(engine: RoundEngine<R>) -> Self {
        let seen_round = engine.round().id;
        Self {
            fade: CueFade::new(engine.cue()),
            engine,
            alert: None,
            clock: CountdownClock::new(),
            seen_round,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// True while something on screen changes without input.
    pub fn is_animating(&self) -> bool {
        self.fade.is_animating()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.alert.take().is_some() {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => {
                if let Err(err) = self.engine.submit() {
                    warn!(%err, "rejected guess");
                    self.alert = Some(Alert::invalid_guess());
                }
            }
            KeyCode::Backspace => self.engine.backspace(),
            KeyCode::Left | KeyCode::BackTab => {
                let difficulty = self.engine.difficulty().previous();
                self.engine.select_difficulty(difficulty);
            }
            KeyCode::Right | KeyCode::Tab => {
                let difficulty = self.engine.difficulty().next();
                self.engine.select_difficulty(difficulty);
            }
            KeyCode::F(n @ 1..=3) => {
                self.engine.select_difficulty(Difficulty::ALL[usize::from(n - 1)]);
            }
            KeyCode::F(5) => self.engine.reset_game(None),
            KeyCode::Char('n') if ctrl => self.engine.reset_game(None),
            KeyCode::Char(c) => {
                self.engine.push_char(c);
            }
            _ => {}
        }

        self.sync();
    }

    /// Feeds wall-clock time to the engine: the delayed restart, whole
    /// countdown seconds and the cue transition. Seconds left over after a
    /// timeout are dropped, so the round it starts keeps its full clock.
    pub fn on_elapsed(&mut self, dt: Duration) {
        self.engine.advance(dt);
        self.sync();

        for _ in 0..self.clock.advance(dt) {
            let outcome = self.engine.tick();
            self.sync();
            if outcome == TickOutcome::TimedOut {
                break;
            }
        }

        self.fade.advance(dt);
    }

    fn sync(&mut self) {
        self.fade.retarget(self.engine.cue());

        let current = self.engine.round().id;
        if current != self.seen_round {
            // a fresh round gets a full first second
            self.clock.reset();
            self.seen_round = current;
        }
    }
}

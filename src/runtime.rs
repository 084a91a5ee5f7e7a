use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // windows reports releases too
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => GameEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How long the loop waits for input before redrawing and feeding the
/// countdown.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Poll interval taken from `Config::tick_interval`.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed source so a round can be played without a terminal.
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// One loop iteration at a time: a key or resize if one arrives within the
/// interval, otherwise [`GameEvent::Tick`].
pub struct Runner<E: EventSource, T: Ticker> {
    events: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(events: E, ticker: T) -> Self {
        Self { events, ticker }
    }

    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    /// A closed source keeps ticking so the countdown still runs.
    pub fn step(&self) -> GameEvent {
        self.events
            .recv_timeout(self.interval())
            .unwrap_or(GameEvent::Tick)
    }
}

/// Turns arbitrary wall-clock deltas into whole countdown seconds.
#[derive(Debug, Default, Clone)]
pub struct CountdownClock {
    carry: Duration,
}

const SECOND: Duration = Duration::from_secs(1);

impl CountdownClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many whole seconds completed during `dt`.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.carry += dt;
        let mut seconds = 0;
        while self.carry >= SECOND {
            self.carry -= SECOND;
            seconds += 1;
        }
        seconds
    }

    /// Drops the partial second, e.g. when a fresh round starts.
    pub fn reset(&mut self) {
        self.carry = Duration::ZERO;
    }
}

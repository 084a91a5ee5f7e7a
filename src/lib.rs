// Library surface for headless/integration tests and reuse.
// The binary only wires the terminal, CLI and logging around it.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod cue;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod logging;
pub mod round;
pub mod runtime;
pub mod session;
pub mod ui;

pub use engine::{GuessOutcome, RoundEngine, Snapshot, TickOutcome};
pub use error::GuessError;

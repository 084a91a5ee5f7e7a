use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use repguess::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    logging,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, GameEvent, Runner, Ticker},
};

/// countdown guessing trainer: find the hidden rep target before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the hidden rep target inside the chosen level's range. Every round has 30 seconds; fewer attempts and more time left earn more points, and consecutive wins build a streak that a timeout wipes out."
)]
pub struct Cli {
    /// level of the first round (overrides the config file)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// milliseconds the event loop waits for input before redrawing
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// config file to read, and to write with --save-config
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command-line flags win over the file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(tick_rate_ms) = self.tick_rate_ms {
            config.tick_rate_ms = tick_rate_ms;
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let logging = logging::init(&AppDirs::log_dir());
    let log_dir = logging.as_ref().map(|guard| guard.log_dir().display().to_string());

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("failed to write {}", store.path().display()))?;
    }
    tracing::info!(?config, ?log_dir, "starting");

    enable_raw_mode().context("failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_interval()),
    );
    // restore the terminal before reporting a loop error
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let session = app.engine.session();
    tracing::info!(
        score = session.score,
        streak = session.streak,
        rounds_won = session.history().len(),
        "session over"
    );

    result
}

fn start_tui<B, E, T, R>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
    runner: &Runner<E, T>,
) -> Result<()>
where
    B: Backend,
    E: EventSource,
    T: Ticker,
    R: Rng,
{
    let mut last = Instant::now();
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        let event = runner.step();

        let now = Instant::now();
        app.on_elapsed(now - last);
        last = now;

        match event {
            GameEvent::Key(key) => app.handle_key(key),
            GameEvent::Resize | GameEvent::Tick => {}
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use repguess::{engine::RoundEngine, runtime::TestEventSource};
    use std::{sync::mpsc, time::Duration};

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["repguess"]);

        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.tick_rate_ms, None);
        assert_eq!(cli.config, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_difficulty() {
        let cli = Cli::parse_from(["repguess", "-d", "easy"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Easy));

        let cli = Cli::parse_from(["repguess", "--difficulty", "hard"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));

        assert!(Cli::try_parse_from(["repguess", "-d", "brutal"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["repguess", "-d", "hard", "--tick-rate-ms", "50"]);
        let config = cli.apply(Config::default());
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.tick_rate_ms, 50);
    }

    #[test]
    fn test_cli_keeps_config_when_flags_absent() {
        let cli = Cli::parse_from(["repguess"]);
        let file = Config {
            difficulty: Difficulty::Easy,
            tick_rate_ms: 250,
        };
        assert_eq!(cli.apply(file.clone()), file);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["repguess", "--config", "/tmp/rg.json", "--save-config"]);
        assert_eq!(cli.config_store().path(), PathBuf::from("/tmp/rg.json"));
        assert!(cli.save_config);
    }

    #[test]
    fn test_start_tui_until_escape() {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut app = App::with_engine(RoundEngine::new(Difficulty::Easy));

        for code in [KeyCode::Char('9'), KeyCode::Char('9'), KeyCode::Enter, KeyCode::Esc] {
            tx.send(GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
                .unwrap();
        }

        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert!(app.should_quit());
        assert_eq!(app.engine.round().attempts, 1);
    }
}

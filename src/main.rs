mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use spelldrill::{
    app_dirs::AppDirs,
    catalog::SqliteCatalog,
    celebration::Confetti,
    config::{ConfigStore, FileConfigStore},
    feedback::LogFeedback,
    runtime::{CrosstermEventSource, DrillEvent, Runner},
    snapshot::{clear_snapshot, FileStateStore},
    word_source::WordSource,
    Phase, SessionController, SessionEvent,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;
const FLASH_SECS: f64 = 1.2;

/// letter-by-letter spelling drill
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Spell a shuffled list of words one letter at a time. Progress is saved after every word, so quitting and coming back resumes where you left off."
)]
pub struct Cli {
    /// milliseconds to pause after each completed word
    #[clap(short = 'd', long)]
    advance_delay_ms: Option<u64>,

    /// discard the saved session and start a new one
    #[clap(long)]
    reset: bool,

    /// add a word to the catalog and exit
    #[clap(long, value_name = "WORD")]
    add_word: Option<String>,

    /// category for --add-word
    #[clap(long, default_value = "regular")]
    category: String,

    /// print the word catalog and exit
    #[clap(long)]
    list: bool,

    /// path of the word catalog database
    #[clap(long)]
    db: Option<PathBuf>,

    /// directory holding the saved session and log file
    #[clap(long)]
    state_dir: Option<PathBuf>,
}

type Controller = SessionController<SqliteCatalog, FileStateStore, LogFeedback>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashKind {
    Good,
    Bad,
}

/// Short-lived message under the word
#[derive(Debug, Clone)]
pub struct Flash {
    pub text: String,
    pub kind: FlashKind,
    pub remaining_secs: f64,
}

pub struct App {
    pub controller: Controller,
    pub confetti: Confetti,
    pub flash: Option<Flash>,
    pub show_completed_words: bool,
}

impl App {
    pub fn new(controller: Controller, show_completed_words: bool) -> Self {
        Self {
            controller,
            confetti: Confetti::new(),
            flash: None,
            show_completed_words,
        }
    }

    fn flash(&mut self, text: &str, kind: FlashKind) {
        self.flash = Some(Flash {
            text: text.to_string(),
            kind,
            remaining_secs: FLASH_SECS,
        });
    }

    fn on_tick(&mut self, elapsed: Duration) {
        if let SessionEvent::NextWord(_) = self.controller.on_tick(elapsed) {
            self.flash = None;
        }
        let dt = elapsed.as_secs_f64();
        self.confetti.update(dt);
        if let Some(flash) = &mut self.flash {
            flash.remaining_secs -= dt;
            if flash.remaining_secs <= 0.0 {
                self.flash = None;
            }
        }
    }

    fn start(&mut self, fresh: bool) {
        self.confetti.stop();
        self.flash = None;
        let result = if fresh {
            self.controller.reset_session()
        } else {
            self.controller.start_session()
        };
        // the error stays visible on the start screen via last_error
        if let Err(e) = result {
            log::warn!("session did not start: {e}");
        }
    }

    /// Returns false when the app should quit
    fn on_key(&mut self, key: KeyEvent, width: u16, height: u16) -> bool {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return false;
        }

        match self.controller.phase() {
            Phase::Idle => {
                if key.code == KeyCode::Enter {
                    self.start(false);
                }
            }
            Phase::SessionComplete => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) {
                    self.start(true);
                }
            }
            Phase::InProgress => match key.code {
                KeyCode::Backspace | KeyCode::Delete => {
                    self.controller.backspace();
                }
                KeyCode::Tab => self.controller.replay_word(),
                KeyCode::Char(c) => {
                    let event = self.controller.submit_letter(c.to_ascii_uppercase());
                    self.on_session_event(event, width, height);
                }
                _ => {}
            },
            Phase::Building | Phase::WordComplete => {}
        }
        true
    }

    fn on_session_event(&mut self, event: SessionEvent, width: u16, height: u16) {
        match event {
            SessionEvent::LetterAccepted => self.flash = None,
            SessionEvent::LetterRejected(_) => self.flash("Nope!", FlashKind::Bad),
            SessionEvent::WordComplete { .. } => {
                self.flash("Correct!", FlashKind::Good);
                self.confetti.burst(width, height, 40);
            }
            SessionEvent::SessionComplete { .. } => {
                self.flash = None;
                self.confetti.start_loop(width, height);
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let state_dir = cli.state_dir.clone().unwrap_or_else(AppDirs::state_dir);
    init_logging(&state_dir);

    let mut config = FileConfigStore::new().load();
    if let Some(ms) = cli.advance_delay_ms {
        config.advance_delay_ms = ms;
    }

    let catalog = SqliteCatalog::open(cli.db.clone().unwrap_or_else(AppDirs::db_path))?;

    if let Some(word) = &cli.add_word {
        catalog.add_word(word, &cli.category, 1)?;
        println!("added {} to {}", word.to_uppercase(), cli.category);
        return Ok(());
    }

    if cli.list {
        for category in catalog.categories()? {
            let words = catalog.words_by_category(&category)?;
            println!("{category} ({}): {}", words.len(), words.iter().join(", "));
        }
        return Ok(());
    }

    let mut store = FileStateStore::with_dir(&state_dir);
    if cli.reset {
        clear_snapshot(&mut store)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = SessionController::new(catalog, store, LogFeedback, &config);
    let mut app = App::new(controller, config.show_completed_words);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    terminal.draw(|f| ui::draw(f, app))?;

    loop {
        match runner.step() {
            DrillEvent::Tick(elapsed) => {
                let animating = app.confetti.is_active() || app.flash.is_some();
                let waiting = app.controller.phase() == Phase::WordComplete;
                app.on_tick(elapsed);
                if animating || waiting {
                    terminal.draw(|f| ui::draw(f, app))?;
                }
            }
            DrillEvent::Resize => {
                terminal.draw(|f| ui::draw(f, app))?;
            }
            DrillEvent::Key(key) => {
                let size = terminal.size().unwrap_or_default();
                if !app.on_key(key, size.width, size.height) {
                    break;
                }
                terminal.draw(|f| ui::draw(f, app))?;
            }
        }
    }

    Ok(())
}

/// Logs go to a file so they never draw over the terminal UI
fn init_logging(state_dir: &Path) {
    if std::fs::create_dir_all(state_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(state_dir.join("drill.log"))
    else {
        return;
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use webbrowser::Browser;

use termfolio::{
    app::{App, Control},
    app_dirs::AppDirs,
    preferences::FilePreferenceStore,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{SessionConfig, SESSION_SECS},
    theme::Theme,
};

/// terminal portfolio with a bug smashing warm-up
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal portfolio: smash bugs for a few seconds, then browse animated skills and project cards."
)]
pub struct Cli {
    /// number of seconds per game session
    #[clap(short = 's', long, default_value_t = SESSION_SECS)]
    session_secs: u32,

    /// color theme for this run (the saved preference is left alone)
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// preferences file to read and write instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// seed for reproducible bug placement
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::with_length(self.session_secs)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn store(&self) -> FilePreferenceStore {
        match &self.config {
            Some(path) => FilePreferenceStore::with_path(path),
            None => FilePreferenceStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let mut app = App::new(cli.session_config(), cli.rng(), Box::new(cli.store()))?;
    if let Some(theme) = cli.theme {
        app = app.with_theme(theme);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.on_resize(size.width, size.height);

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let clock = Instant::now();

    loop {
        app.on_frame(clock.elapsed());
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let control = match runner.step() {
            AppEvent::Key(key) => app.on_key(key),
            AppEvent::Mouse(mouse) => app.on_mouse(mouse),
            AppEvent::Resize(width, height) => {
                app.on_resize(width, height);
                Control::Continue
            }
            AppEvent::Tick => Control::Continue,
        };

        match control {
            Control::Continue => {}
            Control::Open(url) => open_in_browser(&url),
            Control::Quit => break,
        }
    }

    info!("exiting");
    Ok(())
}

fn open_in_browser(url: &str) {
    if !Browser::is_available() {
        warn!(url, "no browser available");
        return;
    }
    match webbrowser::open(url) {
        Ok(()) => info!(url, "opened link"),
        Err(err) => warn!(url, error = %err, "failed to open link"),
    }
}

/// Logs go to the first usable file from `AppDirs::log_paths`. The TUI owns
/// the terminal, so with no usable file nothing is logged at all.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut skipped = Vec::new();
    let mut opened = None;
    for path in AppDirs::log_paths() {
        match open_log(&path) {
            Ok(file) => {
                opened = Some((path, file));
                break;
            }
            Err(err) => skipped.push(format!("{}: {err}", path.display())),
        }
    }

    let Some((path, file)) = opened else {
        tracing_subscriber::registry().with(filter).init();
        return;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
    info!(log = %path.display(), "termfolio starting");
    for reason in skipped {
        warn!(%reason, "log location unusable");
    }
}

fn open_log(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["termfolio"]);

        assert_eq!(cli.session_secs, 15);
        assert_eq!(cli.theme, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_cli_session_secs() {
        let cli = Cli::parse_from(["termfolio", "-s", "30"]);
        assert_eq!(cli.session_secs, 30);
        assert_eq!(cli.session_config().length_secs, 30);

        let cli = Cli::parse_from(["termfolio", "--session-secs", "5"]);
        assert_eq!(cli.session_secs, 5);
    }

    #[test]
    fn test_zero_length_session_is_clamped() {
        let cli = Cli::parse_from(["termfolio", "-s", "0"]);
        assert_eq!(cli.session_config().length_secs, 1);
    }

    #[test]
    fn test_cli_theme() {
        let cli = Cli::parse_from(["termfolio", "--theme", "light"]);
        assert_eq!(cli.theme, Some(Theme::Light));

        let cli = Cli::parse_from(["termfolio", "--theme", "dark"]);
        assert_eq!(cli.theme, Some(Theme::Dark));

        assert!(Cli::try_parse_from(["termfolio", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["termfolio", "--config", "/tmp/prefs.json"]);
        assert_eq!(cli.store().path(), Path::new("/tmp/prefs.json"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;

        let cli = Cli::parse_from(["termfolio", "--seed", "42"]);
        let a: u64 = cli.rng().gen();
        let b: u64 = cli.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cli_rejects_bad_numbers() {
        assert!(Cli::try_parse_from(["termfolio", "-s", "-3"]).is_err());
        assert!(Cli::try_parse_from(["termfolio", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_open_log_creates_the_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/termfolio/termfolio.log");
        open_log(&path).unwrap();
        assert!(path.is_file());

        // reopening appends instead of failing
        open_log(&path).unwrap();
    }

    #[test]
    fn test_open_log_reports_unusable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        assert!(open_log(&blocker.join("termfolio.log")).is_err());
    }
}

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;
use tui::{backend::CrosstermBackend, Terminal};

pub mod aggregate;
pub mod app;
pub mod calendar;
pub mod color;
pub mod config;
pub mod cumulative;
pub mod dashboard;
pub mod dates;
pub mod dimension;
pub mod graph;
pub mod layout;
pub mod legend;
pub mod loader;
pub mod record;
pub mod theme;
pub mod ui;
pub mod window;

use app::input::{handle_key, Action};
use app::state::App;
use config::{Config, APP_DIR};
use theme::Theme;

/// Send `tracing` output to `<data dir>/activity-heatmap/activity-heatmap.log`.
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut dir = dirs::data_dir().ok_or("Could not determine data directory")?;
    dir.push(APP_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join("activity-heatmap.log");
    let file = File::options().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(path)
}

/// Load `path` and run the viewer until the user quits.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let theme = Theme::load();
    let records = loader::load_csv(path)?;
    let mut app = App::new(path.to_path_buf(), records, config, theme);
    if app.dashboard.aggregation.skipped > 0 {
        tracing::info!(skipped = app.dashboard.aggregation.skipped, "rows without a readable timestamp");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(200);
    loop {
        terminal.draw(|f| ui::draw::draw(f, &*app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? {
                // crossterm reports releases too on some platforms
                if kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, code, modifiers) == Action::Quit {
                    return Ok(());
                }
            }
        }
    }
}

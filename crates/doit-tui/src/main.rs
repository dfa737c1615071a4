//! DoIt - a terminal todo list that keeps working offline.
//!
//! Todos are fetched from a REST API and cached locally; when the network
//! is unavailable the cached snapshot is shown instead.

mod app;
mod router;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use doit_core::Config;

use app::{App, AppState, Services};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_NAME: &str = "doit.log";

const USAGE: &str = "\
Usage: doit [OPTIONS] [PATH]

Arguments:
  PATH        Route to open first, e.g. /todos/7 (default /)

Options:
  --offline   Start in offline mode (cached todos only)
  --dump      Print the todo list as JSON and exit
  --help      Show this message

Environment:
  DOIT_API_URL    API base URL (default https://dummyjson.com)
  DOIT_OFFLINE    Start offline (true/false)
  DOIT_PAGE_SIZE  Todos per page
  RUST_LOG        Log filter (default info)";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    offline: bool,
    dump: bool,
    help: bool,
    path: Option<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        for arg in args {
            match arg.as_str() {
                "--offline" => parsed.offline = true,
                "--dump" => parsed.dump = true,
                "--help" | "-h" => parsed.help = true,
                path if path.starts_with('/') && parsed.path.is_none() => {
                    parsed.path = Some(path.to_string());
                }
                other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
            }
        }
        Ok(parsed)
    }
}

/// Log to a file in the cache directory; stderr would corrupt the screen.
fn init_file_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(dir) = config.cache_dir() else {
        // Nowhere to write; keep the subscriber so spans still work
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::sink))
            .with(filter)
            .init();
        return None;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::sink))
            .with(filter)
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load().context("Failed to load config")?;

    if args.dump {
        init_stderr_tracing();
        return dump_todos(&config, args.offline).await;
    }

    let _guard = init_file_tracing(&config);
    info!(api = %config.api_base(), offline = args.offline, "DoIt starting");

    let mut app = App::new(config, args.offline)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Show cached todos while the first fetch runs
    app.load_from_cache().await;
    if let Some(ref path) = args.path {
        if !app.open_path(path) {
            app.status_message = Some(format!("No page at {}", path));
        }
    }
    app.refresh_background();

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("DoIt shutting down");
    Ok(())
}

/// Print the result of the fetch-with-cache policy to stdout as JSON
async fn dump_todos(config: &Config, offline: bool) -> Result<()> {
    let services = Services::new(config, offline || config.offline_mode)?;
    services.check_online().await;
    let todos = services
        .repo
        .fetch_cached_todos()
        .await
        .context("Failed to load todos")?;
    if todos.is_empty() {
        warn!("Todo list is empty");
    }
    println!("{}", serde_json::to_string_pretty(&todos)?);
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    if handle_input(app, key)? {
                        return Ok(());
                    }
                }
            }
        }

        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_args_parse() {
        assert_eq!(args(&[]).unwrap(), Args::default());

        let parsed = args(&["--offline", "--dump"]).unwrap();
        assert!(parsed.offline);
        assert!(parsed.dump);
        assert!(!parsed.help);

        assert!(args(&["-h"]).unwrap().help);

        let parsed = args(&["/todos/7"]).unwrap();
        assert_eq!(parsed.path.as_deref(), Some("/todos/7"));
        assert!(args(&["/", "/todos/1"]).is_err());
    }

    #[test]
    fn test_args_unknown_rejected() {
        let err = args(&["--bogus"]).unwrap_err();
        assert!(err.to_string().contains("Unknown argument: --bogus"));
    }
}

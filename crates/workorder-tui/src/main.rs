use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;
use workorder_core::screen::EditWorkScreen;
use workorder_core::session::Credentials;
use workorder_core::store::Store;
use workorder_service::{BlockingHttpService, SessionStore};
use workorder_tui::app::App;

#[derive(Parser)]
#[command(name = "workorder", about = "Edit and close mechanic work orders")]
struct Cli {
    #[arg(long, env = "WORKORDER_SERVER_URL", default_value = "http://127.0.0.1:3720")]
    server_url: String,

    /// Work order to open
    #[arg(long, conflicts_with = "new")]
    work_id: Option<String>,

    /// Start a new work order instead
    #[arg(long)]
    new: bool,

    #[arg(long, env = "WORKORDER_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "WORKORDER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Where the logged-in session is kept
    #[arg(long, env = "WORKORDER_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Forget the saved session
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let sessions = SessionStore::new(
        cli.session_file
            .clone()
            .unwrap_or_else(SessionStore::default_path),
    );

    if let Some(Commands::Logout) = cli.command {
        sessions.clear()?;
        eprintln!("Logged out");
        return Ok(());
    }

    let service = BlockingHttpService::new(&cli.server_url);
    service
        .health_check()
        .with_context(|| format!("cannot reach {}", cli.server_url))?;

    let session = match (cli.email, cli.password) {
        (Some(email), Some(password)) => {
            let session = service.login(&Credentials { email, password })?;
            sessions.save(&session)?;
            info!("logged in as {}", session.email);
            session
        }
        (Some(_), None) | (None, Some(_)) => bail!("--email and --password go together"),
        (None, None) => match sessions.load()? {
            Some(session) => session,
            None => bail!("not logged in, pass --email and --password"),
        },
    };

    let screen = if cli.new {
        EditWorkScreen::new_create()
    } else {
        match cli.work_id {
            Some(id) => EditWorkScreen::new_edit(id),
            None => bail!("pass --work-id <id> or --new"),
        }
    };

    run_tui(service, Store::new(Some(session)), screen)
}

/// Logs go to the file named by `WORKORDER_LOG`, never to the terminal.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("WORKORDER_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", PathBuf::from(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_tui(service: BlockingHttpService, store: Store, screen: EditWorkScreen) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, App::new(service, store, screen));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Event::Key(key) = event::read()? {
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're in an input mode
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(())
}

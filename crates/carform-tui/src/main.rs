//! Carform - terminal client for car records
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod handlers;
mod ui;

use anyhow::{Context, Result};
use carform_core::HttpCarApi;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use config::{Config, BASE_URL_ENV};

/// Carform - create and update car records from the terminal
#[derive(Parser, Debug)]
#[command(name = "carform")]
#[command(about = "A terminal client for car records")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the cars backend (overrides env and config)
    #[arg(short, long, value_name = "URL")]
    base_url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("carform_tui=info".parse()?)
        .add_directive("carform_core=info".parse()?);

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr) // Write logs to stderr to not interfere with TUI
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // A missing .env is fine
    let _ = dotenvy::dotenv();

    init_logging(args.log_file.as_ref())?;

    let config = Config::load(args.config)?;
    let base_url = config.resolve_base_url(args.base_url, std::env::var(BASE_URL_ENV).ok())?;
    tracing::info!("Starting Carform against {}", base_url);

    let api = HttpCarApi::new(&base_url, config.request_timeout())
        .with_context(|| format!("Failed to create client for {base_url}"))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(Arc::new(api));
    app.reload();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_messages();
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so background results show up promptly
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if handlers::handle_key(app, key) {
                    break;
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quit) {
            break;
        }
    }

    Ok(())
}

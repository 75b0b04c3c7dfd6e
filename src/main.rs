//! pomodoro-widget - floating, draggable Pomodoro countdown for the terminal
//!
//! One countdown widget that can be started, stopped, reset, minimized to an
//! icon and dragged around. Its position and run state survive restarts.

mod config;
mod core;
mod data;
mod frontend;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "pomodoro-widget")]
#[command(about = "Floating, draggable Pomodoro countdown widget", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.pomodoro-widget)
    /// Can also be set via POMODORO_WIDGET_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the saved widget state and exit
    Status,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set custom data directory if specified, before anything resolves paths
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    init_logging()?;
    if let Some(data_dir) = &cli.data_dir {
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    if let Some(Commands::Status) = cli.command {
        return print_status();
    }

    let config = if let Some(config_path) = &cli.config {
        config::Config::load_from_path(config_path)?
    } else {
        config::Config::load()?
    };

    run_tui(config)
}

/// Log to a file in the data directory (use RUST_LOG to control the level)
/// TUI apps can't log to stdout
fn init_logging() -> Result<()> {
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create data directory {:?}", parent))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context(format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();
    Ok(())
}

/// `status` subcommand: show the persisted record without mounting the widget
fn print_status() -> Result<()> {
    use crate::core::persistence::load_state;

    let storage = crate::core::FileStorage::new(config::Config::base_dir()?);
    match load_state(&storage)? {
        Some(state) => {
            println!("Time:      {}", state.display_time());
            println!("Running:   {}", if state.is_running { "yes" } else { "no" });
            println!("Minimized: {}", if state.is_minimized { "yes" } else { "no" });
            println!("Position:  ({}, {})", state.pos_x, state.pos_y);
        }
        None => println!("No saved state"),
    }
    Ok(())
}

/// Run TUI frontend
fn run_tui(config: config::Config) -> Result<()> {
    // Tick sources run as tokio tasks
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_tui(config))
}

/// Single-threaded event loop: input, tick fires, redraw
async fn async_run_tui(config: config::Config) -> Result<()> {
    use crate::core::{AppCore, FileStorage, TickId, TokioTicker};
    use frontend::{Frontend, FrontendEvent, TuiFrontend};
    use std::time::Duration;
    use tokio::sync::mpsc;

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<TickId>();
    let storage = FileStorage::new(config::Config::base_dir()?);
    let ticker = TokioTicker::new(tick_tx);

    // Restore before taking over the terminal so a corrupt record is reported plainly.
    // The page size is not known yet; it is filled in once the frontend exists.
    let mut app_core = AppCore::new(&config, storage, ticker, (0, 0))
        .context("Failed to restore widget state")?;

    let mut frontend = TuiFrontend::new(Duration::from_millis(config.ui.poll_timeout_ms))?;
    let (width, height) = frontend.size();
    app_core.handle_resize(width, height);

    while app_core.running {
        for event in frontend.poll_events()? {
            let result = match event {
                FrontendEvent::Key { code, modifiers } => app_core.handle_key(code, modifiers),
                FrontendEvent::Mouse { kind, x, y, .. } => app_core.handle_mouse(kind, x, y),
                FrontendEvent::Resize { width, height } => {
                    app_core.handle_resize(width, height);
                    Ok(())
                }
            };
            if let Err(e) = result {
                tracing::error!("Error handling input: {:#}", e);
            }
        }

        while let Ok(id) = tick_rx.try_recv() {
            if let Err(e) = app_core.on_tick(id) {
                tracing::error!("Error handling tick: {:#}", e);
            }
        }

        if app_core.take_render_request() {
            frontend.render(app_core.state())?;
        }
    }

    app_core.shutdown();
    frontend.cleanup()?;
    tracing::info!("Exited cleanly");
    Ok(())
}

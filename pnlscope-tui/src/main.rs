//! pnlscope TUI — five-panel terminal dashboard for a trading day's P&L.
//!
//! Panels:
//! 1. Days — available trading days and the loaded day's summary
//! 2. Chart — P&L curve, trade markers, underlying overlay, selection
//! 3. Positions — the book at the selected snapshot
//! 4. Trades — trade tape with per-trade change detail
//! 5. Help — keyboard shortcuts
//!
//! Usage: `pnlscope-tui [DATA_DIR] [--demo]`

mod app;
mod input;
mod persistence;
mod sample_data;
mod theme;
mod ui;
mod worker;

#[cfg(test)]
mod test_helpers;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use pnlscope_core::analyzer::annotate_trades;
use pnlscope_core::source::{DayStore, HttpSource, SnapshotSource};

use crate::app::{AppState, ErrorCategory};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Arguments: optional data directory, --api <url>, --demo.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut data_dir = PathBuf::from("data");
    let mut api_url: Option<String> = None;
    let mut demo = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--demo" => demo = true,
            "--api" => api_url = iter.next().cloned(),
            other if !other.starts_with("--") => data_dir = PathBuf::from(other),
            _ => {}
        }
    }
    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pnlscope")
        .join("state.json");

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    // Spawn worker over the chosen snapshot source
    let source: Box<dyn SnapshotSource> = match &api_url {
        Some(url) => Box::new(HttpSource::new(url)?),
        None => Box::new(DayStore::new(&data_dir)),
    };
    let source_name = source.name().to_string();
    let worker_handle = worker::spawn_worker(source, cmd_rx, resp_tx);

    // Build app state
    let mut app = AppState::new(cmd_tx.clone(), resp_rx, data_dir);

    // Apply persisted state
    persistence::apply(&mut app, persisted);

    if demo {
        let date = sample_data::sample_date();
        app.install_day(date, annotate_trades(sample_data::sample_day()));
        app.days.dates = vec![date];
        app.set_status("Demo day loaded");
    } else {
        app.days.scanning = true;
        let _ = cmd_tx.send(WorkerCommand::ScanDays);
        app.set_status(format!("Reading from {source_name}"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    let _ = persistence::save(&state_path, &persisted);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::DaysScanned { dates } => {
            app.days.scanning = false;
            app.days.dates = dates;
            app.days.cursor = app.days.cursor.min(app.days.dates.len().saturating_sub(1));
            app.set_status(format!("{} trading days found", app.days.dates.len()));

            // Restore the last viewed day, or fall back to the newest.
            if app.day.is_none() && app.loading.is_none() {
                let restore = app
                    .pending_restore
                    .take()
                    .filter(|d| app.days.dates.contains(d))
                    .or_else(|| app.days.dates.first().copied());
                if let Some(date) = restore {
                    app.request_day(date);
                }
            }
        }
        WorkerResponse::ScanFailed { error } => {
            app.days.scanning = false;
            app.push_error(ErrorCategory::Source, error, "scanning data directory".into());
        }
        WorkerResponse::DayLoaded {
            request_id,
            date,
            snapshots,
        } => {
            // Stale responses (superseded request ids) are discarded.
            app.handle_day_loaded(request_id, date, snapshots);
        }
        WorkerResponse::LoadFailed {
            request_id,
            date,
            error,
        } => {
            if app.loading.map(|p| p.request_id) == Some(request_id) {
                app.loading = None;
                let category = if error.contains("malformed") {
                    ErrorCategory::Data
                } else {
                    ErrorCategory::Source
                };
                app.push_error(category, error, format!("loading {date}"));
            }
        }
    }
}

pub mod app;
pub mod config;
pub mod export;
pub mod hover;
pub mod presentation;
pub mod theme;
pub mod trace_view;
mod ui;
pub mod views;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use otlog_core::jsonl::read_trace_file;
use otlog_core::validate::{validate_trace, ValidationError};
use otlog_core::ClientTrace;
use ratatui::prelude::*;
use serde_json::Value;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub trace_path: PathBuf,
    /// Overrides `viewer.mouse_capture` when set.
    pub mouse_capture: Option<bool>,
    /// Print the trace as plain text instead of opening the viewer.
    pub export: bool,
    pub config_path: Option<PathBuf>,
}

/// Load a trace whose operation payloads are arbitrary JSON.
pub fn load_trace(path: &Path) -> Result<ClientTrace<Value>> {
    let trace = read_trace_file(path)
        .with_context(|| format!("Failed to load trace {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        entries = trace.log.len(),
        "trace loaded"
    );
    Ok(trace)
}

/// Check every diagram of `trace`, logging each violation.
pub fn check_trace<P>(trace: &ClientTrace<P>) -> Vec<ValidationError> {
    match validate_trace(trace) {
        Ok(()) => Vec::new(),
        Err(errors) => {
            for error in &errors {
                tracing::warn!("{error}");
            }
            errors
        }
    }
}

/// Tooltip text of a JSON payload: strings verbatim, anything else as
/// pretty JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Launch the viewer (or the plain-text export) with CLI overrides.
pub fn run_with_options(options: RunOptions) -> Result<()> {
    let config = config::load_config(options.config_path.as_deref())?;
    let trace = load_trace(&options.trace_path)?;
    let warnings = check_trace(&trace);

    if options.export {
        print!("{}", export::render_plain(&trace, &warnings));
        return Ok(());
    }

    let mouse_capture_enabled = options
        .mouse_capture
        .unwrap_or(config.viewer.mouse_capture);
    let poll_interval = Duration::from_millis(config.viewer.poll_interval_ms.max(1));

    let mut app = App::new(trace, &config, Box::new(render_value));
    app.title = options
        .trace_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| options.trace_path.display().to_string());
    app.warnings = warnings.iter().map(ToString::to_string).collect();

    // Terminal setup
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    if mouse_capture_enabled {
        stdout().execute(EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = event_loop(&mut terminal, &mut app, poll_interval, mouse_capture_enabled);

    // Restore terminal
    disable_raw_mode()?;
    if mouse_capture_enabled {
        stdout().execute(DisableMouseCapture)?;
    }
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop<B: Backend, P>(
    terminal: &mut Terminal<B>,
    app: &mut App<P>,
    poll_interval: Duration,
    mouse_capture_enabled: bool,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(poll_interval)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if app.handle_key(key.code) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    if !mouse_capture_enabled {
                        continue;
                    }
                    if app.handle_mouse(mouse) {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

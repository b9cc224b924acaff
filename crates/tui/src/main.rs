use clap::Parser;
use otlog_tui::{config, RunOptions};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser)]
#[command(
    name = "otlog-tui",
    about = "Browse an OT client synchronization trace in the terminal"
)]
struct Cli {
    /// Trace file (`.otlog.jsonl` or a JSON document with `initialState` and `log`)
    trace: PathBuf,

    /// Do not capture the mouse (hover tooltips then need Tab focus)
    #[arg(long)]
    no_mouse: bool,

    /// Print the trace as plain text and exit
    #[arg(long)]
    export: bool,

    /// Config file to use instead of ~/.config/otlog/otlog.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let options = RunOptions {
        trace_path: cli.trace,
        mouse_capture: cli.no_mouse.then_some(false),
        export: cli.export,
        config_path: cli.config,
    };

    if let Err(e) = otlog_tui::run_with_options(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to a file: the terminal is owned by the viewer while it runs.
fn init_logging() {
    let Ok(path) = config::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use proctor_core::detection::infrastructure::trace_reader::{read_trace, TraceEvent};
use proctor_core::monitoring::domain::event_log::EventLog;
use proctor_core::monitoring::event_engine::EventEngine;
use proctor_core::monitoring::monitor_logger::{
    MonitorLogger, NullMonitorLogger, StdoutMonitorLogger,
};
use proctor_core::monitoring::monitor_settings::MonitorSettings;
use proctor_core::shared::clock::ManualClock;
use proctor_core::shared::constants::EXPORT_LINES_PER_PAGE;

/// Replay a recorded detection trace through the proctoring engine.
#[derive(Parser)]
#[command(name = "proctor-replay")]
struct Cli {
    /// Trace file (JSON Lines, one detector result per line).
    trace: PathBuf,

    /// Settings file (JSON). Defaults to the user settings, if any.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the paginated log export here instead of printing to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Lines per page in the export.
    #[arg(long, default_value_t = EXPORT_LINES_PER_PAGE)]
    lines_per_page: usize,

    /// Print a per-event summary after the replay.
    #[arg(long)]
    summary: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.summary);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `--summary` raises the default to `info` so
/// the end-of-replay summary is visible.
fn init_logging(summary: bool) {
    let default_level = if summary { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match &cli.settings {
        Some(path) => MonitorSettings::load(path)?,
        None => MonitorSettings::load_or_default(),
    };
    let events = read_trace(&cli.trace)?;
    log::info!("Replaying {} trace events from {}", events.len(), cli.trace.display());

    let logger: Box<dyn MonitorLogger> = if cli.summary {
        Box::new(StdoutMonitorLogger::new())
    } else {
        Box::new(NullMonitorLogger)
    };
    let log = replay(&settings, &events, logger);

    let rendered = render(&log, cli.lines_per_page);
    match &cli.output {
        Some(path) => write_export(path, &rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Feeds every trace event to a fresh engine, with simulated time set to
/// each event's offset.
fn replay(
    settings: &MonitorSettings,
    events: &[TraceEvent],
    logger: Box<dyn MonitorLogger>,
) -> EventLog {
    let clock = ManualClock::new();
    let mut engine = EventEngine::new(settings, Box::new(clock.clone()), logger);
    engine.start();

    for event in events {
        clock.set(event.at);
        engine.handle_result(event.kind, event.size, event.result.clone());
    }

    if let Some(last) = events.last() {
        clock.set(last.at);
    }
    engine.stop();
    engine.into_log()
}

fn render(log: &EventLog, lines_per_page: usize) -> String {
    let pages = log.export_pages(lines_per_page);
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\u{c}');
            out.push('\n');
        }
        for line in page {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn write_export(path: &Path, rendered: &str) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, rendered)
        .map_err(|e| format!("failed to write export to {}: {e}", path.display()))?;
    log::info!("Event log written to {}", path.display());
    Ok(())
}

//! Logging setup for the touch shell
//
// This module provides logging initialization, formatting, and log file management.
// It supports colored console output, file logging, and environment-based log filtering.
//
// Usage:
//   Call `logging::init(verbose, filter, logs_dir)` at the start of main().
//   Keep the returned guard alive for the program's duration.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::fmt::{
    format::{FormatEvent, FormatFields, Writer},
    FmtContext,
};
use tracing_subscriber::registry::LookupSpan;

#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// Initializes logging for the shell.
///
/// - `verbose`: If true, also log to the console with colored formatting.
/// - `default_filter`: `EnvFilter` directive used when `RUST_LOG` is not set.
/// - `logs_dir`: a timestamped folder holding `touch_shell.log` is created here.
/// - Returns: LogGuard, which must be kept alive for file logging.
pub fn init(verbose: bool, default_filter: &str, logs_dir: &Path) -> Result<LogGuard> {
    let now = Local::now();
    let log_folder = logs_dir.join(format!("{}", now.format("%Y-%m-%d_%H-%M-%S")));
    fs::create_dir_all(&log_folder)
        .with_context(|| format!("Failed to create log folder {}", log_folder.display()))?;
    let log_path = log_folder.join("touch_shell.log");

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {} for writing", log_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    use tracing_subscriber::prelude::*;
    let env_filter = match std::env::var("RUST_LOG").ok() {
        Some(val) => tracing_subscriber::EnvFilter::new(val),
        None => tracing_subscriber::EnvFilter::new(default_filter),
    };
    // File log: plain formatting, no ANSI/color codes
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if verbose {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_thread_ids(true)
            .event_format(GorgeousFormatter);
        registry
            .with(console_layer)
            .try_init()
            .context("Failed to install the tracing subscriber")?;
    } else {
        registry
            .try_init()
            .context("Failed to install the tracing subscriber")?;
    }

    tracing::debug!("Logging to {}", log_path.display());
    Ok(LogGuard(guard))
}

/// Custom event formatter for colored console output.
pub struct GorgeousFormatter;

impl<S, N> FormatEvent<S, N> for GorgeousFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        use std::fmt::Write as _;
        let meta = event.metadata();
        let now = chrono::Local::now();
        let (level_str, level_color) = level_style(*meta.level());

        write!(writer, "\x1b[2;36m{}\x1b[0m ", now.format("%H:%M:%S%.3f"))?;
        write!(writer, "{}{}\x1b[0m ", level_color, level_str)?;
        // Remote engine callbacks
        if meta.target() == "remote" {
            write!(writer, "\x1b[1;96m<remote>\x1b[0m ")?;
        } else {
            let thread = std::thread::current();
            write!(writer, "\x1b[2;35m[{}]\x1b[0m ", thread.name().unwrap_or("?"))?;
            write!(writer, "\x1b[4;2;33m{}\x1b[0m: ", meta.target())?;
        }

        let mut visitor = MsgVisitor(String::new());
        event.record(&mut visitor);
        writeln!(writer, "{}", visitor.0.trim())
    }
}

fn level_style(level: tracing::Level) -> (&'static str, &'static str) {
    match level {
        tracing::Level::ERROR => ("ERROR", "\x1b[1;91m"),
        tracing::Level::WARN => ("WARN ", "\x1b[1;93m"),
        tracing::Level::INFO => ("INFO ", "\x1b[1;94m"),
        tracing::Level::DEBUG => ("DEBUG", "\x1b[1;92m"),
        tracing::Level::TRACE => ("TRACE", "\x1b[1;95m"),
    }
}

/// Collects every field of an event into one line.
struct MsgVisitor(String);

impl tracing_subscriber::field::Visit for MsgVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        use std::fmt::Write;
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        if field.name() == "message" {
            let _ = write!(self.0, "{:?}", value);
        } else {
            let _ = write!(self.0, "{}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        if field.name() != "message" {
            self.0.push_str(field.name());
            self.0.push('=');
        }
        self.0.push_str(value);
    }
}

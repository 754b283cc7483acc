#![deny(missing_docs)]
//! Shared logging utilities for the notes workspace.
//!
//! `notes_*` macros wrap the `log` facade so call sites stay uniform;
//! [`initialize`] wires `simplelog` for the binary.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Trace-level message through the `log` facade.
#[macro_export]
macro_rules! notes_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

/// Debug-level message through the `log` facade.
#[macro_export]
macro_rules! notes_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

/// Info-level message through the `log` facade.
#[macro_export]
macro_rules! notes_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

/// Warn-level message through the `log` facade.
#[macro_export]
macro_rules! notes_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

/// Error-level message through the `log` facade.
#[macro_export]
macro_rules! notes_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogDestination {
    /// Write to the log file only.
    #[default]
    File,
    /// Write to stderr, leaving stdout to the front end.
    Terminal,
    /// Write to both file and stderr.
    Both,
}

impl LogDestination {
    /// Whether records go to stderr.
    pub fn writes_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    /// Whether records go to the log file.
    pub fn writes_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Parses a level name such as `"info"` or `"DEBUG"`.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or(LevelFilter::Info)
}

/// Installs the process logger.
///
/// The file at `log_path` is truncated. If it cannot be created the
/// remaining destinations still apply. A second call is ignored.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        if let Some(file_logger) = create_file_logger(level, config, log_path) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

/// Stderr logger for tests. Later calls, from any test, are no-ops.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

//! Stderr backend for the `log` facade.
//!
//! - **Quiet** (`-q`): errors only
//! - **Default**: warnings, such as redefinitions
//! - `-v` info, `-vv` debug (every namespace insertion), `-vvv` trace

use anyhow::{Result, anyhow};
use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Maps the CLI flags to a level filter.
pub fn level_filter(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the logger for the current process.
pub fn init(quiet: bool, verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|_| anyhow!("a logger is already installed"))?;
    log::set_max_level(level_filter(quiet, verbose));
    Ok(())
}

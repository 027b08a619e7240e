//! Logging setup
//!
//! `env_logger` writing every record to stderr and, unless disabled, to an
//! append-mode log file, so per-line warnings and per-file failures survive
//! the terminal.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{FilterError, Result};

/// Writes everything to two sinks
pub struct TeeWriter<A: Write, B: Write> {
    primary: A,
    secondary: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.secondary.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

/// Level from the verbosity flags
pub fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Log destination: stderr, teed into `log_file` when one is given
pub fn sink(log_file: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    let Some(log_file) = log_file else {
        return Ok(Box::new(io::stderr()));
    };

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FilterError::file_io(parent, e))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| FilterError::file_io(log_file, e))?;

    Ok(Box::new(TeeWriter::new(io::stderr(), file)))
}

/// Install the global logger. `RUST_LOG` overrides `level`.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let target = sink(log_file)?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(target))
        .try_init()
        .map_err(|e| FilterError::config(format!("cannot install logger: {}", e)))
}

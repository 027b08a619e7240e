//! Output management module
//!
//! Each input file gets three append-mode outputs named after it, one under
//! each of `filtered_files/`, `toxic_files/` and `error_files/`.

use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{FilterError, Result};

/// Default buffer size for file writing (8MB)
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Destination stream for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Clean,
    Toxic,
    Error,
}

impl Stream {
    pub const ALL: [Stream; 3] = [Stream::Clean, Stream::Toxic, Stream::Error];

    /// Subdirectory of the output base directory
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Clean => "filtered_files",
            Self::Toxic => "toxic_files",
            Self::Error => "error_files",
        }
    }

    /// Output path for `input` under `base`
    pub fn path_for(self, base: &Path, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "output".into());
        base.join(self.dir_name()).join(name)
    }
}

/// Append-only buffered writer
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl OutputWriter {
    /// Open `path` for appending, creating it and its parent directory if needed
    pub fn open(path: PathBuf, buffer_size: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            ensure_output_dir(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| FilterError::file_io(&path, e))?;

        Ok(Self {
            writer: BufWriter::with_capacity(buffer_size, file),
            path,
        })
    }

    /// Write an input line exactly as read. A final line without `\n` gets
    /// one, so a later append cannot run into it.
    pub fn write_raw(&mut self, line: &[u8]) -> Result<()> {
        self.writer
            .write_all(line)
            .and_then(|_| match line.last() {
                Some(b'\n') => Ok(()),
                _ => self.writer.write_all(b"\n"),
            })
            .map_err(|e| FilterError::file_io(&self.path, e))
    }

    /// Serialize `record` as one JSON line
    pub fn write_record(&mut self, record: &Value) -> Result<()> {
        let line = serde_json::to_vec(record)
            .map_err(|e| FilterError::record_parse(format!("cannot serialize record: {}", e)))?;

        self.writer
            .write_all(&line)
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| FilterError::file_io(&self.path, e))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| FilterError::file_io(&self.path, e))
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// The clean/toxic/error writers for one input file
pub struct OutputSet {
    clean: OutputWriter,
    toxic: OutputWriter,
    error: OutputWriter,
}

impl OutputSet {
    pub fn open(base: &Path, input: &Path, buffer_size: usize) -> Result<Self> {
        Ok(Self {
            clean: OutputWriter::open(Stream::Clean.path_for(base, input), buffer_size)?,
            toxic: OutputWriter::open(Stream::Toxic.path_for(base, input), buffer_size)?,
            error: OutputWriter::open(Stream::Error.path_for(base, input), buffer_size)?,
        })
    }

    pub fn get_mut(&mut self, stream: Stream) -> &mut OutputWriter {
        match stream {
            Stream::Clean => &mut self.clean,
            Stream::Toxic => &mut self.toxic,
            Stream::Error => &mut self.error,
        }
    }

    pub fn flush_all(&mut self) -> Result<()> {
        self.clean.flush()?;
        self.toxic.flush()?;
        self.error.flush()
    }
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| FilterError::file_io(path, e))?;
    }
    Ok(())
}

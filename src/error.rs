//! Error taxonomy
//!
//! Only [`FilterError::Config`] is fatal for a run. Record and match errors are
//! recovered per line, file I/O errors are recovered per file.

use std::path::{Path, PathBuf};

/// Result type alias using the crate's error type
pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Denylist missing, undecodable, or the matcher could not be built
    #[error("configuration error: {0}")]
    Config(String),

    /// A single input line is not a JSON object
    #[error("record parse error: {0}")]
    RecordParse(String),

    /// Verification of a single candidate word failed
    #[error("match error for '{word}': {reason}")]
    Match { word: String, reason: String },

    /// An input or output file could not be opened, read or written
    #[error("file error on {path:?}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FilterError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn file_io(path: &Path, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn record_parse(msg: impl Into<String>) -> Self {
        Self::RecordParse(msg.into())
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self {
        Self::RecordParse(e.to_string())
    }
}

//! Memory-mapped input
//!
//! Input files can be many gigabytes, so they are mapped rather than read and
//! split into lines lazily. Lines are yielded as raw bytes with their trailing
//! newline, so clean and malformed records can be copied out verbatim.

use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{FilterError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read-only mapping of one input file
pub struct MappedFile {
    path: PathBuf,
    /// `None` for empty files, which cannot be mapped
    mmap: Option<Mmap>,
}

impl MappedFile {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FilterError::file_io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| FilterError::file_io(path, e))?
            .len();

        let mmap = if len == 0 {
            None
        } else {
            // The mapping is read-only and input files are not modified while a run is in progress
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| FilterError::file_io(path, e))?;
            Some(mmap)
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mapped size in bytes, including any BOM
    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }

    /// File content with a leading UTF-8 BOM removed
    pub fn content(&self) -> &[u8] {
        let bytes: &[u8] = self.mmap.as_deref().unwrap_or(&[]);
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    }

    pub fn lines(&self) -> RawLines<'_> {
        RawLines::new(self.content())
    }
}

/// Iterator over newline-terminated slices of a byte buffer.
///
/// The final line is yielded without a newline if the buffer does not end
/// with one. Concatenating every yielded slice reproduces the buffer.
pub struct RawLines<'a> {
    remaining: &'a [u8],
}

impl<'a> RawLines<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }
}

impl<'a> Iterator for RawLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let end = memchr::memchr(b'\n', self.remaining)
            .map(|i| i + 1)
            .unwrap_or(self.remaining.len());

        let (line, rest) = self.remaining.split_at(end);
        self.remaining = rest;
        Some(line)
    }
}

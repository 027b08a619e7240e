//! Input resolution
//!
//! Turns the command line into the list of files to process: either a part
//! list (`part_<N>.txt`, one path per line) or a file/directory scan.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{FilterError, Result};

/// Where the input file list comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// `<paths_dir>/part_<part>.txt`
    Part { paths_dir: PathBuf, part: u32 },
    /// A single file, or a directory scanned by extension
    Path {
        input: PathBuf,
        recursive: bool,
        extensions: Vec<String>,
    },
}

impl InputSource {
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        match self {
            Self::Part { paths_dir, part } => read_path_list(&part_list_path(paths_dir, *part)),
            Self::Path {
                input,
                recursive,
                extensions,
            } => collect_files(input, *recursive, extensions),
        }
    }
}

/// Location of the path list for `part`
pub fn part_list_path(paths_dir: &Path, part: u32) -> PathBuf {
    paths_dir.join(format!("part_{}.txt", part))
}

/// Read one input path per line, skipping blank lines
pub fn read_path_list(list: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(list)
        .map_err(|e| FilterError::config(format!("cannot read path list {:?}: {}", list, e)))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Collect files to process, sorted by path
pub fn collect_files(input: &Path, recursive: bool, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if input.is_file() {
        files.push(input.to_path_buf());
    } else if input.is_dir() {
        let walker = if recursive {
            WalkDir::new(input)
        } else {
            WalkDir::new(input).max_depth(1)
        };

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| extensions.contains(&ext.to_lowercase()))
                .unwrap_or(false);

            if matches {
                files.push(path.to_path_buf());
            }
        }
    } else {
        return Err(FilterError::config(format!(
            "input path does not exist: {:?}",
            input
        )));
    }

    files.sort();
    Ok(files)
}

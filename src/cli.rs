//! Command-line interface definition for toxic-filter
//!
//! Provides argument parsing and validation for the filtering tool.

use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};

use crate::batch::BatchConfig;
use crate::inputs::InputSource;
use crate::processor::ProcessorConfig;

/// High-performance toxic word filter for JSONL corpora
///
/// Splits line-delimited JSON records into clean, toxic and malformed streams
/// based on whole-word, case-insensitive matches against a denylist.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "toxic-filter",
    author = "m0h1nd4",
    version,
    about = "High-performance whole-word denylist filter for JSONL corpora",
    long_about = r#"
Splits JSONL records into clean, toxic and malformed streams. A record is toxic
when its "text" attribute contains a denylist word as a whole word
(case-insensitive). Toxic records gain a "toxic_word" attribute.

OUTPUT LAYOUT (under the output directory):
    filtered_files/<name>   clean records, byte-for-byte
    toxic_files/<name>      toxic records with "toxic_word"
    error_files/<name>      lines that are not JSON objects

Outputs are appended to, never truncated. Run each input set once: a rerun
over the same files duplicates records already written. A last input line
without a trailing newline is written with one, so appended runs never merge
two records into one line.

EXAMPLES:
    # Process the files listed in paths/part_3.txt
    toxic-filter --denylist toxic_words.txt --part 3 --paths-dir paths -o results

    # Process every .jsonl file in a directory tree
    toxic-filter --denylist toxic_words.txt -i /data/shards --recursive -o results
"#
)]
#[command(group(ArgGroup::new("source").required(true).args(["part", "input"])))]
pub struct Args {
    /// Denylist file, one word per line
    #[arg(short, long, value_name = "FILE")]
    pub denylist: PathBuf,

    /// Part number: reads input paths from <PATHS_DIR>/part_<N>.txt
    #[arg(long, value_name = "N")]
    pub part: Option<u32>,

    /// Directory holding part_<N>.txt path lists (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub paths_dir: Option<PathBuf>,

    /// Input file or directory path
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output base directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// File extensions to process in directory mode
    #[arg(long, value_name = "EXT", default_value = "jsonl,json")]
    pub extensions: String,

    /// Number of worker threads (default: auto-detect)
    #[arg(short = 't', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Buffer size for each output file (e.g. "64KB", "8MB")
    #[arg(long, value_name = "SIZE", default_value = "8MB")]
    pub buffer_size: String,

    /// Append-mode log file (not written in dry-run mode)
    #[arg(long, value_name = "FILE", default_value = "toxic_filter.log")]
    pub log_file: PathBuf,

    /// Number of most frequent toxic words shown in the summary
    #[arg(long, value_name = "NUM", default_value_t = 20)]
    pub top_words: usize,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Exit with status 2 when any input file failed
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Dry run - list planned outputs without writing any file, log file included
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl Args {
    /// Parse buffer size string to bytes
    pub fn parse_buffer_size(&self) -> anyhow::Result<usize> {
        let size = parse_size(&self.buffer_size)?;
        if size == 0 {
            anyhow::bail!("Buffer size must be greater than zero");
        }
        Ok(size)
    }

    /// Output base directory; a part run writes under `<output>/part_<N>`
    pub fn get_output_dir(&self) -> PathBuf {
        let base = self.output.clone().unwrap_or_else(|| PathBuf::from("."));
        match self.part {
            Some(part) => base.join(format!("part_{}", part)),
            None => base,
        }
    }

    /// Log file to append to; none in dry-run mode
    pub fn log_target(&self) -> Option<&Path> {
        if self.dry_run {
            None
        } else {
            Some(&self.log_file)
        }
    }

    /// Parse file extensions to process
    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn input_source(&self) -> anyhow::Result<InputSource> {
        match (self.part, &self.input) {
            (Some(part), None) => Ok(InputSource::Part {
                paths_dir: self.paths_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
                part,
            }),
            (None, Some(input)) => Ok(InputSource::Path {
                input: input.clone(),
                recursive: self.recursive,
                extensions: self.get_extensions(),
            }),
            _ => anyhow::bail!("Exactly one of --part or --input must be given"),
        }
    }

    pub fn batch_config(&self) -> anyhow::Result<BatchConfig> {
        Ok(BatchConfig {
            processor: ProcessorConfig {
                output_dir: self.get_output_dir(),
                buffer_size: self.parse_buffer_size()?,
            },
            threads: self.threads,
            quiet: self.quiet,
        })
    }
}

/// Parse human-readable size string to bytes
fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    Ok(num * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("toxic-filter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_part_invocation() {
        let args = parse(&["-d", "words.txt", "--part", "3", "--paths-dir", "lists", "-o", "results"]);

        assert_eq!(args.get_output_dir(), PathBuf::from("results/part_3"));
        match args.input_source().unwrap() {
            InputSource::Part { paths_dir, part } => {
                assert_eq!(paths_dir, PathBuf::from("lists"));
                assert_eq!(part, 3);
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_input_invocation() {
        let args = parse(&["-d", "words.txt", "-i", "/data", "-r", "--extensions", ".JSONL, txt"]);

        assert_eq!(args.get_output_dir(), PathBuf::from("."));
        assert_eq!(args.get_extensions(), vec!["jsonl", "txt"]);
        assert!(matches!(
            args.input_source().unwrap(),
            InputSource::Path { recursive: true, .. }
        ));
    }

    #[test]
    fn test_source_is_required_and_exclusive() {
        assert!(Args::try_parse_from(["toxic-filter", "-d", "w.txt"]).is_err());
        assert!(Args::try_parse_from([
            "toxic-filter", "-d", "w.txt", "--part", "1", "-i", "/data"
        ])
        .is_err());
    }

    #[test]
    fn test_batch_config() {
        let args = parse(&["-d", "w.txt", "-i", "x", "-t", "4", "--buffer-size", "64KB"]);
        let config = args.batch_config().unwrap();

        assert_eq!(config.threads, Some(4));
        assert_eq!(config.processor.buffer_size, 64 * 1024);
    }

    #[test]
    fn test_dry_run_has_no_log_file() {
        let args = parse(&["-d", "w.txt", "-i", "x", "--log-file", "run.log"]);
        assert_eq!(args.log_target(), Some(Path::new("run.log")));

        let args = parse(&["-d", "w.txt", "-i", "x", "--log-file", "run.log", "--dry-run"]);
        assert_eq!(args.log_target(), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64MB").unwrap(), 64 * 1024 * 1024);
        assert_eq!(parse_size("8GB").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1024KB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert!(parse_size("lots").is_err());
    }
}

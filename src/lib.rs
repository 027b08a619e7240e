//! # Toxic Filter
//!
//! High-throughput denylist filtering for line-delimited JSON corpora.
//!
//! ## Features
//!
//! - **Whole-word matching**: a denylist word never matches inside a larger word
//! - **Sub-linear in denylist size**: one Aho-Corasick pass per record, with
//!   per-word boundary verification only for the few raw hits
//! - **Large file support**: memory-mapped input, records streamed line by line
//! - **Parallel processing**: one worker per file over a bounded thread pool
//! - **Fault isolation**: malformed lines go to an error stream, unreadable
//!   files are reported without stopping the batch
//!
//! ## Usage
//!
//! ```bash
//! # Files listed in paths/part_3.txt, outputs under results/part_3/
//! toxic-filter --denylist toxic_words.txt --part 3 --paths-dir paths -o results
//!
//! # Every .jsonl/.json file under a directory
//! toxic-filter --denylist toxic_words.txt -i /data/shards --recursive -o results
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use toxic_filter::batch::{BatchConfig, BatchCoordinator};
//! use toxic_filter::matcher::Matcher;
//! use toxic_filter::processor::ProcessorConfig;
//! use std::path::{Path, PathBuf};
//!
//! let matcher = Matcher::from_path(Path::new("toxic_words.txt")).unwrap();
//! if let Some(word) = matcher.find_first_match("This is SPAM.") {
//!     println!("matched {}", word);
//! }
//!
//! let config = BatchConfig {
//!     processor: ProcessorConfig::new("./results"),
//!     threads: None,
//!     quiet: false,
//! };
//! let summary = BatchCoordinator::new(&matcher, config)
//!     .run(&[PathBuf::from("shard_000.jsonl")])
//!     .unwrap();
//! println!("{} toxic lines", summary.totals().toxic_lines);
//! ```

pub mod batch;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod processor;
pub mod progress;
pub mod reader;
pub mod wordset;

pub use batch::{BatchConfig, BatchCoordinator, BatchSummary};
pub use classifier::{RecordClassifier, Verdict};
pub use cli::Args;
pub use error::{FilterError, Result};
pub use matcher::Matcher;
pub use processor::{FileProcessor, ProcessingResult, ProcessorConfig};
pub use wordset::WordSet;

//! Batch coordination
//!
//! Fans input files out over a bounded worker pool. Each file is processed by
//! exactly one worker into its own outputs; the read-only matcher is the only
//! state workers share. Results are aggregated as they complete.

use crossbeam_channel::unbounded;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::{FilterError, Result};
use crate::matcher::Matcher;
use crate::processor::{FileProcessor, ProcessingResult, ProcessorConfig};
use crate::progress::create_progress_bar;

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub processor: ProcessorConfig,
    /// Upper bound on workers; defaults to available parallelism
    pub threads: Option<usize>,
    pub quiet: bool,
}

/// A file that could not be processed
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub file: PathBuf,
    pub reason: String,
}

/// Aggregated outcome of a batch
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub workers: usize,
    pub results: Vec<ProcessingResult>,
    pub failures: Vec<FileFailure>,
    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Sum over every successfully processed file
    pub fn totals(&self) -> ProcessingResult {
        self.results.iter().sum()
    }

    pub fn files_processed(&self) -> usize {
        self.results.len()
    }

    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn lines_per_second(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.totals().total_lines as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Write the totals to the log
    pub fn log(&self) {
        let totals = self.totals();
        log::info!(
            "Processing summary: files processed {}, files failed {}, lines {}, clean {}, toxic {}, errors {}, file time {:.2}s, wall time {:.2}s",
            self.files_processed(),
            self.files_failed(),
            totals.total_lines,
            totals.clean_lines,
            totals.toxic_lines,
            totals.error_lines,
            totals.processing_time.as_secs_f64(),
            self.elapsed.as_secs_f64()
        );
        for failure in &self.failures {
            log::error!("Failed file {:?}: {}", failure.file, failure.reason);
        }
    }
}

/// Worker count for `files` inputs: never more workers than files
pub fn pool_size(files: usize, threads: Option<usize>) -> usize {
    let available = threads.unwrap_or_else(num_cpus::get).max(1);
    files.min(available).max(1)
}

pub struct BatchCoordinator<'m> {
    matcher: &'m Matcher,
    config: BatchConfig,
}

impl<'m> BatchCoordinator<'m> {
    pub fn new(matcher: &'m Matcher, config: BatchConfig) -> Self {
        Self { matcher, config }
    }

    /// Process every file and aggregate the results.
    ///
    /// Per-file failures are collected in the summary and never abort the
    /// batch. Only failing to start the worker pool is an error.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchSummary> {
        let start = Instant::now();
        let workers = pool_size(files.len(), self.config.threads);
        let mut summary = BatchSummary {
            workers,
            ..BatchSummary::default()
        };

        if files.is_empty() {
            log::warn!("No input files to process");
            return Ok(summary);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("toxic-worker-{}", i))
            .build()
            .map_err(|e| FilterError::config(format!("cannot start worker pool: {}", e)))?;

        log::info!(
            "Starting batch processing of {} files with {} workers",
            files.len(),
            workers
        );

        let pb = if self.config.quiet {
            indicatif::ProgressBar::hidden()
        } else {
            create_progress_bar(files.len() as u64, "Processing...")
        };

        let (tx, rx) = unbounded::<(PathBuf, Result<ProcessingResult>)>();
        let matcher = self.matcher;
        let processor_config = &self.config.processor;

        pool.in_place_scope(|scope| {
            for path in files {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let processor = FileProcessor::new(matcher, processor_config.clone());
                    let outcome = processor.process(path);
                    // The receiver outlives the scope
                    let _ = tx.send((path.clone(), outcome));
                });
            }
            drop(tx);

            for (path, outcome) in rx.iter() {
                match outcome {
                    Ok(result) => summary.results.push(result),
                    Err(e) => {
                        // Keep the I/O cause in the reason
                        let reason = format!("{:#}", anyhow::Error::from(e));
                        log::error!("Error processing file {:?}: {}", path, reason);
                        summary.failures.push(FileFailure { file: path, reason });
                    }
                }
                pb.inc(1);
            }
        });

        pb.finish_and_clear();
        summary.elapsed = start.elapsed();
        Ok(summary)
    }
}

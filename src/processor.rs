//! Core processing engine
//!
//! Streams one input file through the record classifier and routes every line
//! to its clean, toxic or error output.

use ahash::RandomState;
use hashbrown::HashMap;
use std::iter::Sum;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::classifier::{RecordClassifier, Verdict};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::output::{OutputSet, Stream, DEFAULT_BUFFER_SIZE};
use crate::reader::MappedFile;

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub output_dir: PathBuf,
    pub buffer_size: usize,
}

impl ProcessorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Statistics for one processed file, or the sum over many
#[derive(Debug, Clone, Default)]
pub struct ProcessingResult {
    pub file: PathBuf,
    pub total_lines: u64,
    pub clean_lines: u64,
    pub toxic_lines: u64,
    pub error_lines: u64,
    pub bytes_read: u64,
    pub processing_time: Duration,
    pub toxic_word_counts: HashMap<String, u64, RandomState>,
}

impl ProcessingResult {
    pub fn new(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            ..Self::default()
        }
    }

    /// Count one routed line
    pub fn record(&mut self, verdict: &Verdict<'_>) {
        self.total_lines += 1;
        match verdict {
            Verdict::Clean => self.clean_lines += 1,
            Verdict::Toxic { word, .. } => {
                self.toxic_lines += 1;
                *self.toxic_word_counts.entry((*word).to_string()).or_insert(0) += 1;
            }
            Verdict::Malformed(_) => self.error_lines += 1,
        }
    }

    /// Every line lands in exactly one stream
    pub fn is_balanced(&self) -> bool {
        self.clean_lines + self.toxic_lines + self.error_lines == self.total_lines
    }

    /// Word counts sorted by count descending, then word
    pub fn top_words(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut words: Vec<(&str, u64)> = self
            .toxic_word_counts
            .iter()
            .map(|(w, c)| (w.as_str(), *c))
            .collect();
        words.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(limit);
        words
    }
}

impl AddAssign<&ProcessingResult> for ProcessingResult {
    fn add_assign(&mut self, other: &ProcessingResult) {
        self.total_lines += other.total_lines;
        self.clean_lines += other.clean_lines;
        self.toxic_lines += other.toxic_lines;
        self.error_lines += other.error_lines;
        self.bytes_read += other.bytes_read;
        self.processing_time += other.processing_time;
        for (word, count) in &other.toxic_word_counts {
            *self.toxic_word_counts.entry(word.clone()).or_insert(0) += count;
        }
    }
}

impl<'a> Sum<&'a ProcessingResult> for ProcessingResult {
    fn sum<I: Iterator<Item = &'a ProcessingResult>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, r| {
            acc += r;
            acc
        })
    }
}

/// Processes one input file end-to-end
pub struct FileProcessor<'m> {
    classifier: RecordClassifier<'m>,
    config: ProcessorConfig,
}

impl<'m> FileProcessor<'m> {
    pub fn new(matcher: &'m Matcher, config: ProcessorConfig) -> Self {
        Self {
            classifier: RecordClassifier::new(matcher),
            config,
        }
    }

    /// Classify every line of `input` and append it to the matching output.
    ///
    /// Malformed lines are logged and routed to the error stream. Failing to
    /// open or write any of the four files aborts this file only.
    pub fn process(&self, input: &Path) -> Result<ProcessingResult> {
        let start = Instant::now();
        let mut result = ProcessingResult::new(input);

        let mapped = MappedFile::open(input)?;
        let mut outputs = OutputSet::open(&self.config.output_dir, input, self.config.buffer_size)?;
        result.bytes_read = mapped.size() as u64;

        for (idx, line) in mapped.lines().enumerate() {
            let verdict = self.classifier.classify(line);

            match &verdict {
                Verdict::Clean => outputs.get_mut(Stream::Clean).write_raw(line)?,
                Verdict::Toxic { record, .. } => {
                    outputs.get_mut(Stream::Toxic).write_record(record)?
                }
                Verdict::Malformed(e) => {
                    log::warn!("JSON decode error in {:?} line {}: {}", input, idx + 1, e);
                    outputs.get_mut(Stream::Error).write_raw(line)?;
                }
            }

            result.record(&verdict);
        }

        outputs.flush_all()?;

        result.processing_time = start.elapsed();
        log::info!(
            "Processed {:?} in {:.2} seconds ({} lines, {} toxic, {} errors)",
            input,
            result.processing_time.as_secs_f64(),
            result.total_lines,
            result.toxic_lines,
            result.error_lines
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::wordset::WordSet;
    use std::fs;
    use tempfile::TempDir;

    const FIVE_LINES: &str = concat!(
        "{\"id\":1,\"text\":\"the cat sat\"}\n",
        "{\"id\":2,\"text\":\"I hate SPAM!\"}\n",
        "{\"id\":3,\"text\":\"concatenate strings\"}\n",
        "{\"id\":4,\"text\":\"\"}\n",
        "{\"id\":5,\"text\":\"broken\n",
    );

    fn matcher() -> Matcher {
        Matcher::new(&WordSet::from_words(["cat", "spam"])).unwrap()
    }

    fn read(dir: &TempDir, stream: Stream, name: &str) -> String {
        fs::read_to_string(dir.path().join(stream.dir_name()).join(name)).unwrap()
    }

    #[test]
    fn test_five_line_scenario() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("sample.jsonl");
        fs::write(&input, FIVE_LINES).unwrap();

        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()));
        let result = processor.process(&input).unwrap();

        assert_eq!(result.total_lines, 5);
        assert_eq!(result.clean_lines, 2);
        assert_eq!(result.toxic_lines, 2);
        assert_eq!(result.error_lines, 1);
        assert!(result.is_balanced());
        assert_eq!(result.toxic_word_counts.get("cat"), Some(&1));
        assert_eq!(result.toxic_word_counts.get("spam"), Some(&1));

        assert_eq!(
            read(&output_dir, Stream::Clean, "sample.jsonl"),
            "{\"id\":3,\"text\":\"concatenate strings\"}\n{\"id\":4,\"text\":\"\"}\n"
        );
        assert_eq!(
            read(&output_dir, Stream::Toxic, "sample.jsonl"),
            concat!(
                "{\"id\":1,\"text\":\"the cat sat\",\"toxic_word\":\"cat\"}\n",
                "{\"id\":2,\"text\":\"I hate SPAM!\",\"toxic_word\":\"spam\"}\n",
            )
        );
        assert_eq!(
            read(&output_dir, Stream::Error, "sample.jsonl"),
            "{\"id\":5,\"text\":\"broken\n"
        );
    }

    #[test]
    fn test_clean_lines_are_byte_identical() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("spacing.jsonl");
        let content = "{ \"text\" :  \"nothing here\" ,\"x\":1}\r\n{\"text\":\"last line\"}";
        fs::write(&input, content).unwrap();

        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()));
        let result = processor.process(&input).unwrap();

        assert_eq!(result.clean_lines, 2);
        assert_eq!(
            read(&output_dir, Stream::Clean, "spacing.jsonl"),
            format!("{}\n", content)
        );
    }

    #[test]
    fn test_toxic_records_rematch() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("rematch.jsonl");
        fs::write(&input, FIVE_LINES).unwrap();

        let m = matcher();
        FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()))
            .process(&input)
            .unwrap();

        for line in read(&output_dir, Stream::Toxic, "rematch.jsonl").lines() {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            let text = record["text"].as_str().unwrap();
            assert_eq!(m.find_first_match(text), record["toxic_word"].as_str());
        }
        for line in read(&output_dir, Stream::Clean, "rematch.jsonl").lines() {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            let text = record["text"].as_str().unwrap_or("");
            assert_eq!(m.find_first_match(text), None);
        }
    }

    #[test]
    fn test_rerun_appends() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("twice.jsonl");
        fs::write(&input, "{\"text\":\"fine\"}\n").unwrap();

        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()));
        processor.process(&input).unwrap();
        processor.process(&input).unwrap();

        assert_eq!(
            read(&output_dir, Stream::Clean, "twice.jsonl"),
            "{\"text\":\"fine\"}\n{\"text\":\"fine\"}\n"
        );
    }

    #[test]
    fn test_rerun_keeps_unterminated_last_lines_separate() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("tail.jsonl");
        fs::write(&input, "{\"text\":\"a\"}\n{\"text\":\"b\"}").unwrap();
        let broken = input_dir.path().join("broken_tail.jsonl");
        fs::write(&broken, "{\"text\":\"a\"}\n{\"text\":").unwrap();

        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()));
        for _ in 0..2 {
            processor.process(&input).unwrap();
            processor.process(&broken).unwrap();
        }

        let clean = read(&output_dir, Stream::Clean, "tail.jsonl");
        assert_eq!(clean.lines().count(), 4);
        for line in clean.lines() {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok(), "{:?}", line);
        }
        assert_eq!(
            read(&output_dir, Stream::Error, "broken_tail.jsonl"),
            "{\"text\":\n{\"text\":\n"
        );
    }

    #[test]
    fn test_output_base_is_regular_file() {
        let input_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("shard.jsonl");
        fs::write(&input, FIVE_LINES).unwrap();
        let blocker = input_dir.path().join("not_a_dir");
        fs::write(&blocker, b"").unwrap();

        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(&blocker));

        let err = processor.process(&input).unwrap_err();
        assert!(matches!(err, FilterError::FileIo { .. }));
    }

    #[test]
    fn test_missing_input_is_file_error() {
        let output_dir = TempDir::new().unwrap();
        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()));

        let err = processor
            .process(Path::new("/nonexistent/missing.jsonl"))
            .unwrap_err();
        assert!(matches!(err, FilterError::FileIo { .. }));
    }

    #[test]
    fn test_chunked_results_sum_to_single_pass() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let m = matcher();
        let processor = FileProcessor::new(&m, ProcessorConfig::new(output_dir.path()));

        let whole = input_dir.path().join("whole.jsonl");
        fs::write(&whole, FIVE_LINES).unwrap();
        let single = processor.process(&whole).unwrap();

        let lines: Vec<&str> = FIVE_LINES.split_inclusive('\n').collect();
        let chunks: Vec<ProcessingResult> = lines
            .chunks(2)
            .enumerate()
            .map(|(i, chunk)| {
                let path = input_dir.path().join(format!("chunk_{}.jsonl", i));
                fs::write(&path, chunk.concat()).unwrap();
                processor.process(&path).unwrap()
            })
            .collect();

        let summed: ProcessingResult = chunks.iter().sum();
        assert_eq!(summed.total_lines, single.total_lines);
        assert_eq!(summed.clean_lines, single.clean_lines);
        assert_eq!(summed.toxic_lines, single.toxic_lines);
        assert_eq!(summed.error_lines, single.error_lines);
        assert_eq!(summed.bytes_read, single.bytes_read);
        assert_eq!(summed.toxic_word_counts, single.toxic_word_counts);
    }

    #[test]
    fn test_top_words_ordering() {
        let mut result = ProcessingResult::default();
        result.toxic_word_counts.insert("b".into(), 3);
        result.toxic_word_counts.insert("a".into(), 3);
        result.toxic_word_counts.insert("c".into(), 7);

        assert_eq!(result.top_words(2), vec![("c", 7), ("a", 3)]);
    }
}

//! Record classification
//!
//! Pure: takes one raw input line and decides where it goes. All writing
//! happens in the file processor.

use serde_json::Value;

use crate::error::FilterError;
use crate::matcher::Matcher;

/// Attribute holding the text to scan
pub const TEXT_FIELD: &str = "text";

/// Attribute attached to toxic records
pub const TOXIC_WORD_FIELD: &str = "toxic_word";

/// Destination of a single record
#[derive(Debug)]
pub enum Verdict<'m> {
    /// No denylist word, or no text to scan
    Clean,
    /// `record` already carries the `toxic_word` attribute
    Toxic { word: &'m str, record: Value },
    /// Not a JSON object
    Malformed(FilterError),
}

impl Verdict<'_> {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    pub fn toxic_word(&self) -> Option<&str> {
        match self {
            Self::Toxic { word, .. } => Some(*word),
            _ => None,
        }
    }
}

pub struct RecordClassifier<'m> {
    matcher: &'m Matcher,
}

impl<'m> RecordClassifier<'m> {
    pub fn new(matcher: &'m Matcher) -> Self {
        Self { matcher }
    }

    /// Classify one line (trailing newline allowed)
    pub fn classify(&self, line: &[u8]) -> Verdict<'m> {
        let mut record: Value = match serde_json::from_slice(line) {
            Ok(v) => v,
            Err(e) => return Verdict::Malformed(e.into()),
        };

        let Some(fields) = record.as_object_mut() else {
            return Verdict::Malformed(FilterError::record_parse("line is not a JSON object"));
        };

        // Absent, empty or non-string text is never scanned
        let word = match fields.get(TEXT_FIELD).and_then(Value::as_str) {
            Some(text) if !text.is_empty() => self.matcher.find_first_match(text),
            _ => None,
        };

        match word {
            Some(word) => {
                fields.insert(TOXIC_WORD_FIELD.to_string(), Value::from(word));
                Verdict::Toxic { word, record }
            }
            None => Verdict::Clean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordset::WordSet;

    fn matcher() -> Matcher {
        Matcher::new(&WordSet::from_words(["cat", "spam"])).unwrap()
    }

    #[test]
    fn test_clean_record() {
        let m = matcher();
        let c = RecordClassifier::new(&m);
        assert!(c.classify(br#"{"text": "concatenate strings"}"#).is_clean());
    }

    #[test]
    fn test_toxic_record_gets_word() {
        let m = matcher();
        let c = RecordClassifier::new(&m);

        let verdict = c.classify(b"{\"id\": 7, \"text\": \"This is SPAM.\"}\n");
        assert_eq!(verdict.toxic_word(), Some("spam"));

        let Verdict::Toxic { record, .. } = verdict else {
            panic!("expected toxic verdict");
        };
        assert_eq!(record["toxic_word"], "spam");
        assert_eq!(record["id"], 7);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":7,"text":"This is SPAM.","toxic_word":"spam"}"#
        );
    }

    #[test]
    fn test_existing_toxic_word_is_overwritten_in_place() {
        let m = matcher();
        let c = RecordClassifier::new(&m);

        let verdict = c.classify(br#"{"toxic_word": "old", "text": "a cat"}"#);
        let Verdict::Toxic { record, .. } = verdict else {
            panic!("expected toxic verdict");
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"toxic_word":"cat","text":"a cat"}"#
        );
    }

    #[test]
    fn test_missing_or_empty_text_is_clean() {
        let m = matcher();
        let c = RecordClassifier::new(&m);

        assert!(c.classify(br#"{"id": 1}"#).is_clean());
        assert!(c.classify(br#"{"text": ""}"#).is_clean());
        assert!(c.classify(br#"{"text": null}"#).is_clean());
        assert!(c.classify(br#"{"text": ["cat"]}"#).is_clean());
    }

    #[test]
    fn test_malformed_lines() {
        let m = matcher();
        let c = RecordClassifier::new(&m);

        assert!(c.classify(b"{\"text\": \"cat\"").is_malformed());
        assert!(c.classify(b"\n").is_malformed());
        assert!(c.classify(b"[1, 2, 3]\n").is_malformed());
        assert!(c.classify(b"\"cat\"").is_malformed());
        assert!(c.classify(b"{\"text\": \"\xFF\"}").is_malformed());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let m = matcher();
        let c = RecordClassifier::new(&m);
        let line = br#"{"text": "the cat sat"}"#;

        assert_eq!(c.classify(line).toxic_word(), c.classify(line).toxic_word());
    }
}

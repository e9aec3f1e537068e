use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::dataset::{COLUMN_ACCURACY, COLUMN_FLUENCY, COLUMN_TEXT};
use crate::types::{Row, SentenceId};

/// Difficulty tier assigned by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Short sentences with high accuracy.
    Beginner,
    /// Medium-length sentences with moderate accuracy.
    Intermediate,
    /// Everything else.
    Advanced,
}

impl Level {
    /// All tiers, easiest first. Artifacts are emitted in this order.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Lowercase name used in both artifacts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary category of a practice sentence.
///
/// Only `Conversation` is produced from the dataset; the other values exist
/// because the seeded table admits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Everyday spoken sentences.
    Conversation,
    /// Workplace sentences.
    Business,
    /// Test preparation sentences.
    Exam,
}

impl Purpose {
    /// Every purpose accepted by the table's CHECK constraint.
    pub const ALL: [Purpose; 3] = [Purpose::Conversation, Purpose::Business, Purpose::Exam];

    /// Lowercase name used in both artifacts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Purpose::Conversation => "conversation",
            Purpose::Business => "business",
            Purpose::Exam => "exam",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a row was rejected before classification.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MalformedRecord {
    /// The text column held something other than a string.
    #[error("column '{column}' is not a string: {value}")]
    NonStringText {
        /// Offending column.
        column: &'static str,
        /// Value found in it.
        value: Value,
    },
    /// A score column held something other than a number.
    #[error("column '{column}' is not a number: {value}")]
    NonNumericScore {
        /// Offending column.
        column: &'static str,
        /// Value found in it.
        value: Value,
    },
}

/// One dataset row reduced to the fields the classifier consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    /// Untrimmed sentence text; empty when the row had none.
    pub text: String,
    /// Sentence accuracy score, when present.
    pub accuracy: Option<f64>,
    /// Sentence fluency score, when present.
    pub fluency: Option<f64>,
}

impl RawRecord {
    /// Extract the consumed columns from a decoded row.
    ///
    /// Missing or null fields are treated as absent. Present fields of the
    /// wrong JSON type reject the whole row.
    pub fn from_row(row: &Row) -> Result<Self, MalformedRecord> {
        let text = match row.get(COLUMN_TEXT) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(MalformedRecord::NonStringText {
                    column: COLUMN_TEXT,
                    value: other.clone(),
                });
            }
        };
        Ok(Self {
            text,
            accuracy: score_field(row, COLUMN_ACCURACY)?,
            fluency: score_field(row, COLUMN_FLUENCY)?,
        })
    }
}

fn score_field(row: &Row, column: &'static str) -> Result<Option<f64>, MalformedRecord> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(other) => Err(MalformedRecord::NonNumericScore {
            column,
            value: other.clone(),
        }),
    }
}

/// A classified sentence ready for emission.
///
/// Field order and names here define the serialized shape in the front-end data file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeSentence {
    /// 1-based id, contiguous across all tiers in classification order.
    pub id: SentenceId,
    /// Trimmed sentence text.
    pub text: String,
    /// Assigned difficulty tier.
    pub level: Level,
    /// Always `Conversation` for dataset rows.
    pub purpose: Purpose,
    /// Accuracy score from the dataset, or the default when absent.
    pub target_accuracy: f64,
    /// Fluency score from the dataset, or the default when absent.
    pub target_fluency: f64,
    /// Whitespace-separated token count of `text`.
    pub word_count: usize,
    /// Dataset label the sentence came from.
    pub source: String,
}

/// Classified sentences grouped by tier, each in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierBuckets {
    /// Beginner sentences.
    pub beginner: Vec<PracticeSentence>,
    /// Intermediate sentences.
    pub intermediate: Vec<PracticeSentence>,
    /// Advanced sentences.
    pub advanced: Vec<PracticeSentence>,
}

impl TierBuckets {
    /// Sentences accumulated in `level`.
    pub fn get(&self, level: Level) -> &[PracticeSentence] {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }

    /// Number of sentences across all tiers.
    pub fn total(&self) -> usize {
        self.beginner.len() + self.intermediate.len() + self.advanced.len()
    }

    /// Leading `cap` sentences of `level`.
    pub fn head(&self, level: Level, cap: usize) -> &[PracticeSentence] {
        let sentences = self.get(level);
        &sentences[..cap.min(sentences.len())]
    }

    pub(crate) fn push(&mut self, sentence: PracticeSentence) {
        match sentence.level {
            Level::Beginner => self.beginner.push(sentence),
            Level::Intermediate => self.intermediate.push(sentence),
            Level::Advanced => self.advanced.push(sentence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn from_row_treats_missing_and_null_fields_as_absent() {
        let record = RawRecord::from_row(&row(json!({"text": "hi", "fluency": null}))).unwrap();
        assert_eq!(record.text, "hi");
        assert_eq!(record.accuracy, None);
        assert_eq!(record.fluency, None);

        let record = RawRecord::from_row(&row(json!({"accuracy": 0.9}))).unwrap();
        assert_eq!(record.text, "");
        assert_eq!(record.accuracy, Some(0.9));
    }

    #[test]
    fn from_row_accepts_integer_scores() {
        let record =
            RawRecord::from_row(&row(json!({"text": "x", "accuracy": 8, "fluency": 9}))).unwrap();
        assert_eq!(record.accuracy, Some(8.0));
        assert_eq!(record.fluency, Some(9.0));
    }

    #[test]
    fn from_row_rejects_wrongly_typed_fields() {
        let err = RawRecord::from_row(&row(json!({"text": "x", "accuracy": "high"}))).unwrap_err();
        assert!(matches!(
            err,
            MalformedRecord::NonNumericScore { column: "accuracy", .. }
        ));

        let err = RawRecord::from_row(&row(json!({"text": 42}))).unwrap_err();
        assert!(matches!(err, MalformedRecord::NonStringText { column: "text", .. }));
    }

    #[test]
    fn levels_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Level::Intermediate).unwrap(), json!("intermediate"));
        assert_eq!(serde_json::to_value(Purpose::Conversation).unwrap(), json!("conversation"));
        assert_eq!(Level::Advanced.to_string(), "advanced");
    }

    #[test]
    fn head_never_exceeds_available_sentences() {
        let buckets = TierBuckets::default();
        assert!(buckets.head(Level::Beginner, 20).is_empty());
        assert_eq!(buckets.total(), 0);
    }
}

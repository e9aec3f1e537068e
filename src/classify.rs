//! Difficulty classification of raw dataset rows.
//!
//! Rows are visited once, in source order. Each retained row becomes one
//! `PracticeSentence` in exactly one tier; ids are handed out from a counter
//! that only advances when a sentence is kept.

use tracing::{debug, warn};

use crate::constants::classifier::{
    BEGINNER_MAX_WORDS, BEGINNER_MIN_ACCURACY, DEFAULT_SCORE, INTERMEDIATE_MAX_WORDS,
    INTERMEDIATE_MIN_ACCURACY,
};
use crate::data::{Level, PracticeSentence, Purpose, RawRecord, TierBuckets};
use crate::types::{Row, SentenceId};

/// Output of a classification pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Retained sentences by tier.
    pub buckets: TierBuckets,
    /// Rows dropped because their text was empty after trimming.
    pub skipped_empty: usize,
    /// Rows dropped because a consumed field had the wrong type.
    pub skipped_malformed: usize,
}

/// Tier for a sentence of `word_count` words with the given accuracy.
///
/// Word count is checked first: a long sentence is never beginner no matter
/// how accurate.
pub fn assign_level(word_count: usize, accuracy: f64) -> Level {
    if word_count <= BEGINNER_MAX_WORDS && accuracy >= BEGINNER_MIN_ACCURACY {
        Level::Beginner
    } else if word_count <= INTERMEDIATE_MAX_WORDS && accuracy >= INTERMEDIATE_MIN_ACCURACY {
        Level::Intermediate
    } else {
        Level::Advanced
    }
}

/// Number of whitespace-separated tokens in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Build the sentence for `record` with id `id`, or `None` when its text is blank.
pub fn classify_record(
    record: &RawRecord,
    id: SentenceId,
    source_label: &str,
) -> Option<PracticeSentence> {
    let text = record.text.trim();
    if text.is_empty() {
        return None;
    }
    let word_count = word_count(text);
    let accuracy = record.accuracy.unwrap_or(DEFAULT_SCORE);
    let fluency = record.fluency.unwrap_or(DEFAULT_SCORE);
    Some(PracticeSentence {
        id,
        text: text.to_string(),
        level: assign_level(word_count, accuracy),
        purpose: Purpose::Conversation,
        target_accuracy: accuracy,
        target_fluency: fluency,
        word_count,
        source: source_label.to_string(),
    })
}

/// Classify already-extracted records.
pub fn classify_records<'a, I>(records: I, source_label: &str) -> Classification
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut classification = Classification::default();
    let mut next_id: SentenceId = 1;
    for record in records {
        next_id = accumulate(&mut classification, record, next_id, source_label);
    }
    classification
}

/// Classify decoded rows, skipping malformed ones.
pub fn classify(rows: &[Row], source_label: &str) -> Classification {
    let mut classification = Classification::default();
    let mut next_id: SentenceId = 1;
    for (idx, row) in rows.iter().enumerate() {
        match RawRecord::from_row(row) {
            Ok(record) => {
                next_id = accumulate(&mut classification, &record, next_id, source_label);
            }
            Err(reason) => {
                warn!(row = idx, %reason, "skipping malformed record");
                classification.skipped_malformed += 1;
            }
        }
    }
    classification
}

/// Add `record` to `classification`; returns the id to use for the next kept record.
fn accumulate(
    classification: &mut Classification,
    record: &RawRecord,
    next_id: SentenceId,
    source_label: &str,
) -> SentenceId {
    match classify_record(record, next_id, source_label) {
        Some(sentence) => {
            debug!(
                id = sentence.id,
                tier = %sentence.level,
                words = sentence.word_count,
                "classified"
            );
            classification.buckets.push(sentence);
            next_id + 1
        }
        None => {
            classification.skipped_empty += 1;
            next_id
        }
    }
}

//! Dataset retrieval.
//!
//! A `RecordSource` hands back every row of one dataset split in source
//! order, or fails. There is no partial result: callers either get the full
//! row set or an error describing why the dataset is unavailable.

use crate::errors::SeedError;
use crate::types::Row;

/// Shard discovery and row decoding shared by sources.
pub mod shards;
/// Local snapshot directory source.
pub mod snapshot;
#[cfg(feature = "huggingface")]
/// Hugging Face hub-backed source.
pub mod huggingface;

#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceSource;
pub use snapshot::SnapshotSource;

/// Producer of the raw rows fed to the classifier.
pub trait RecordSource {
    /// Stable source identifier used in logs and errors.
    fn id(&self) -> &str;
    /// Retrieve the complete ordered row set.
    ///
    /// A single attempt is made; any failure is returned unchanged.
    fn fetch(&self) -> Result<Vec<Row>, SeedError>;
}

/// In-memory rows, mainly for tests and callers that decode rows themselves.
#[derive(Clone, Debug)]
pub struct StaticSource {
    source_id: String,
    rows: Vec<Row>,
}

impl StaticSource {
    /// Serve `rows` as-is under `source_id`.
    pub fn new(source_id: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            source_id: source_id.into(),
            rows,
        }
    }
}

impl RecordSource for StaticSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn fetch(&self) -> Result<Vec<Row>, SeedError> {
        Ok(self.rows.clone())
    }
}

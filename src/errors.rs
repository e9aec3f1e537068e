use std::io;

use thiserror::Error;

use crate::types::SourceId;

/// Error type for dataset retrieval, configuration, and artifact IO failures.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The dataset could not be listed, downloaded, or read.
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Source that failed.
        source_id: SourceId,
        /// Human-readable cause.
        reason: String,
    },
    /// The dataset was readable but its contents do not have the expected shape.
    #[error("data source '{source_id}' returned inconsistent state: {details}")]
    SourceInconsistent {
        /// Source that failed.
        source_id: SourceId,
        /// What was wrong with the data.
        details: String,
    },
    /// Local filesystem failure, typically while writing an artifact.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Artifact data could not be serialized.
    #[error("failed serializing artifact: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Invalid run configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SeedError {
    /// True when the error came from retrieving the dataset rather than from local output.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            SeedError::SourceUnavailable { .. } | SeedError::SourceInconsistent { .. }
        )
    }
}

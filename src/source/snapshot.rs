use std::path::PathBuf;
use tracing::info;

use crate::config::DatasetConfig;
use crate::errors::SeedError;
use crate::types::Row;

use super::RecordSource;
use super::shards::{discover_shards, read_rows};

/// Rows read from shard files already on local disk.
///
/// The directory is treated as a single split: every accepted shard below it
/// is read, in path order.
pub struct SnapshotSource {
    config: DatasetConfig,
    snapshot_dir: PathBuf,
}

impl SnapshotSource {
    /// Read shards for `config` from `snapshot_dir`.
    pub fn new(config: DatasetConfig, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            snapshot_dir: snapshot_dir.into(),
        }
    }
}

impl RecordSource for SnapshotSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn fetch(&self) -> Result<Vec<Row>, SeedError> {
        info!(
            source = %self.config.source_id,
            dir = %self.snapshot_dir.display(),
            "reading local snapshot"
        );
        let shards = discover_shards(&self.config, &self.snapshot_dir)?;
        read_rows(&self.config.source_id, &shards, self.config.max_rows)
    }
}

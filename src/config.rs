use std::path::PathBuf;

use crate::constants::{caps, dataset, output};
use crate::data::Level;
use crate::types::{DatasetId, SourceId};

/// Identity and shard filtering for the dataset being fetched.
#[derive(Clone, Debug)]
pub struct DatasetConfig {
    /// Stable source id used in logs and errors.
    pub source_id: SourceId,
    /// Hugging Face dataset id, e.g. `mispeech/speechocean762`.
    pub dataset: DatasetId,
    /// Split name, e.g. `test`.
    pub split: String,
    /// File extensions accepted as shard files.
    pub shard_extensions: Vec<String>,
    /// Optional maximum number of rows read across all shards.
    pub max_rows: Option<usize>,
}

impl DatasetConfig {
    /// Create a config for `dataset`/`split` with the default shard extensions.
    pub fn new(
        source_id: impl Into<SourceId>,
        dataset: impl Into<DatasetId>,
        split: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            dataset: dataset.into(),
            split: split.into(),
            shard_extensions: dataset::SHARD_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_rows: None,
        }
    }

    /// Normalized (lowercase, no leading dot) accepted extensions.
    pub fn accepted_extensions(&self) -> Vec<String> {
        self.shard_extensions
            .iter()
            .map(|value| value.trim().trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::new(
            dataset::SOURCE_LABEL,
            dataset::DATASET_ID,
            dataset::DATASET_SPLIT,
        )
    }
}

/// Maximum number of sentences selected per tier for one artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierCaps {
    /// Cap for beginner sentences.
    pub beginner: usize,
    /// Cap for intermediate sentences.
    pub intermediate: usize,
    /// Cap for advanced sentences.
    pub advanced: usize,
}

impl TierCaps {
    /// Same cap for every tier.
    pub const fn uniform(cap: usize) -> Self {
        Self {
            beginner: cap,
            intermediate: cap,
            advanced: cap,
        }
    }

    /// Caps for the bundled front-end data file (decreasing with difficulty).
    pub const fn structured_data() -> Self {
        Self {
            beginner: caps::STRUCTURED_BEGINNER,
            intermediate: caps::STRUCTURED_INTERMEDIATE,
            advanced: caps::STRUCTURED_ADVANCED,
        }
    }

    /// Caps for the SQL seed migration.
    pub const fn migration() -> Self {
        Self::uniform(caps::MIGRATION_PER_TIER)
    }

    /// Cap applied to `level`.
    pub fn for_level(&self, level: Level) -> usize {
        match level {
            Level::Beginner => self.beginner,
            Level::Intermediate => self.intermediate,
            Level::Advanced => self.advanced,
        }
    }
}

/// Where the two artifacts are written.
#[derive(Clone, Debug)]
pub struct OutputPaths {
    /// TypeScript data file consumed by the front end.
    pub structured_data: PathBuf,
    /// SQL migration seeding the practice sentence table.
    pub migration: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            structured_data: PathBuf::from(output::STRUCTURED_DATA_PATH),
            migration: PathBuf::from(output::MIGRATION_PATH),
        }
    }
}

/// Top-level run configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Dataset identity and shard filtering.
    pub dataset: DatasetConfig,
    /// Value written into every sentence's `source` field and the SQL column default.
    pub source_label: String,
    /// Per-tier caps for the front-end data file.
    pub structured_caps: TierCaps,
    /// Per-tier caps for the SQL migration.
    ///
    /// Kept separate from `structured_caps`; the two artifacts are sized independently.
    pub migration_caps: TierCaps,
    /// Artifact destinations.
    pub outputs: OutputPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            source_label: dataset::SOURCE_LABEL.to_string(),
            structured_caps: TierCaps::structured_data(),
            migration_caps: TierCaps::migration(),
            outputs: OutputPaths::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_caps_decrease_with_difficulty() {
        let caps = TierCaps::structured_data();
        assert!(caps.beginner > caps.intermediate);
        assert!(caps.intermediate > caps.advanced);
    }

    #[test]
    fn migration_caps_are_uniform_and_independent() {
        let caps = TierCaps::migration();
        assert_eq!(caps, TierCaps::uniform(10));
        assert_ne!(caps, TierCaps::structured_data());
        assert_eq!(caps.for_level(Level::Advanced), 10);
    }

    #[test]
    fn accepted_extensions_are_normalized() {
        let mut config = DatasetConfig::default();
        config.shard_extensions = vec![".Parquet".to_string(), " JSONL ".to_string()];
        assert_eq!(config.accepted_extensions(), vec!["parquet", "jsonl"]);
    }

    #[test]
    fn defaults_point_at_speechocean_test_split() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset.dataset, "mispeech/speechocean762");
        assert_eq!(config.dataset.split, "test");
        assert_eq!(
            config.outputs.migration,
            PathBuf::from("supabase/migrations/001_add_speechocean_sentences.sql")
        );
    }
}

//! Fetch, classify, and emit, in that order.
//!
//! The run either completes with both artifacts written or stops at the fetch
//! stage with nothing written. Both artifacts are rendered before the first
//! file is touched.

use std::path::PathBuf;
use tracing::{error, info};

use crate::classify::{Classification, classify};
use crate::config::PipelineConfig;
use crate::data::Level;
use crate::emit::{Artifact, migration, typescript, write_artifact};
use crate::errors::SeedError;
use crate::source::RecordSource;

/// Per-tier sentence counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TierCounts {
    /// Beginner count.
    pub beginner: usize,
    /// Intermediate count.
    pub intermediate: usize,
    /// Advanced count.
    pub advanced: usize,
}

impl TierCounts {
    /// Sum over all tiers.
    pub fn total(&self) -> usize {
        self.beginner + self.intermediate + self.advanced
    }
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Rows returned by the source.
    pub rows_fetched: usize,
    /// Classified sentences per tier (before capping).
    pub classified: TierCounts,
    /// Rows dropped for blank text.
    pub skipped_empty: usize,
    /// Rows dropped for wrongly typed fields.
    pub skipped_malformed: usize,
    /// Paths of the written artifacts, data file first.
    pub written: Vec<PathBuf>,
}

/// Terminal state of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both artifacts were written.
    Completed(RunReport),
    /// The dataset could not be retrieved; no files were written.
    NoDataset {
        /// Why retrieval failed.
        reason: String,
    },
}

/// Render both artifacts for an already classified dataset.
pub fn render_artifacts(
    config: &PipelineConfig,
    classification: &Classification,
) -> Result<[Artifact; 2], SeedError> {
    let structured = typescript::render(
        &classification.buckets,
        &config.structured_caps,
        &config.source_label,
    )?;
    let sql = migration::render(
        &classification.buckets,
        &config.migration_caps,
        &config.source_label,
    );
    Ok([
        Artifact::new(&config.outputs.structured_data, structured),
        Artifact::new(&config.outputs.migration, sql),
    ])
}

/// Execute the full pipeline against `source`.
///
/// Fetch failures are reported as `RunOutcome::NoDataset`; only failures after
/// a successful fetch (rendering or writing) are returned as errors.
pub fn run(config: &PipelineConfig, source: &dyn RecordSource) -> Result<RunOutcome, SeedError> {
    info!(source = source.id(), "fetching dataset");
    let rows = match source.fetch() {
        Ok(rows) => rows,
        Err(err) => {
            error!(source = source.id(), error = %err, "failed to fetch dataset");
            return Ok(RunOutcome::NoDataset {
                reason: err.to_string(),
            });
        }
    };
    info!(rows = rows.len(), "dataset loaded");

    info!("categorizing sentences by difficulty");
    let classification = classify(&rows, &config.source_label);
    let classified = TierCounts {
        beginner: classification.buckets.get(Level::Beginner).len(),
        intermediate: classification.buckets.get(Level::Intermediate).len(),
        advanced: classification.buckets.get(Level::Advanced).len(),
    };
    for level in Level::ALL {
        info!(
            tier = %level,
            sentences = classification.buckets.get(level).len(),
            "tier statistics"
        );
    }
    if classification.skipped_empty > 0 || classification.skipped_malformed > 0 {
        info!(
            empty = classification.skipped_empty,
            malformed = classification.skipped_malformed,
            "rows skipped"
        );
    }

    let artifacts = render_artifacts(config, &classification)?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        write_artifact(artifact)?;
        written.push(artifact.path.clone());
    }
    info!("data processing completed");

    Ok(RunOutcome::Completed(RunReport {
        rows_fetched: rows.len(),
        classified,
        skipped_empty: classification.skipped_empty,
        skipped_malformed: classification.skipped_malformed,
        written,
    }))
}

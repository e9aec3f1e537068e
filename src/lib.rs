#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Difficulty tier assignment.
pub mod classify;
/// Command-line runner behind the binary.
pub mod cli;
/// Run configuration types.
pub mod config;
/// Centralized constants: dataset identity, thresholds, caps, and paths.
pub mod constants;
/// Record and sentence types.
pub mod data;
/// Artifact emitters.
pub mod emit;
/// End-to-end run orchestration.
pub mod pipeline;
/// Dataset sources.
pub mod source;
/// Shared type aliases.
pub mod types;

mod errors;

pub use classify::{Classification, assign_level, classify, classify_record, classify_records};
pub use config::{DatasetConfig, OutputPaths, PipelineConfig, TierCaps};
pub use data::{Level, MalformedRecord, PracticeSentence, Purpose, RawRecord, TierBuckets};
pub use emit::{Artifact, write_artifact};
pub use errors::SeedError;
pub use pipeline::{RunOutcome, RunReport, TierCounts, run};
#[cfg(feature = "huggingface")]
pub use source::HuggingFaceSource;
pub use source::{RecordSource, SnapshotSource, StaticSource};
pub use types::{DatasetId, RemotePath, Row, SentenceId, SourceId};

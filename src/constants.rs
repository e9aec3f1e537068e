/// Dataset identity and row column names.
pub mod dataset {
    /// Hugging Face dataset repository consumed by default.
    pub const DATASET_ID: &str = "mispeech/speechocean762";
    /// Split read by default.
    pub const DATASET_SPLIT: &str = "test";
    /// Label stored in every emitted sentence's `source` field.
    pub const SOURCE_LABEL: &str = "speechocean762";
    /// Column carrying the sentence text.
    pub const COLUMN_TEXT: &str = "text";
    /// Column carrying the sentence-level accuracy score.
    pub const COLUMN_ACCURACY: &str = "accuracy";
    /// Column carrying the sentence-level fluency score.
    pub const COLUMN_FLUENCY: &str = "fluency";
    /// Columns projected out of each row; everything else (audio, per-word scores) is ignored.
    pub const CONSUMED_COLUMNS: [&str; 3] = [COLUMN_TEXT, COLUMN_ACCURACY, COLUMN_FLUENCY];
    /// Shard file extensions accepted from the hub or a local snapshot.
    pub const SHARD_EXTENSIONS: [&str; 3] = ["parquet", "jsonl", "ndjson"];
}

/// Thresholds used to assign difficulty tiers.
pub mod classifier {
    /// Score assumed when a row carries no accuracy or fluency value.
    pub const DEFAULT_SCORE: f64 = 0.7;
    /// Longest sentence (in words) that can be beginner.
    pub const BEGINNER_MAX_WORDS: usize = 8;
    /// Minimum accuracy for beginner.
    pub const BEGINNER_MIN_ACCURACY: f64 = 0.8;
    /// Longest sentence (in words) that can be intermediate.
    pub const INTERMEDIATE_MAX_WORDS: usize = 15;
    /// Minimum accuracy for intermediate.
    pub const INTERMEDIATE_MIN_ACCURACY: f64 = 0.6;
}

/// Per-tier selection caps for each artifact.
pub mod caps {
    /// Beginner sentences bundled into the front-end data file.
    pub const STRUCTURED_BEGINNER: usize = 20;
    /// Intermediate sentences bundled into the front-end data file.
    pub const STRUCTURED_INTERMEDIATE: usize = 15;
    /// Advanced sentences bundled into the front-end data file.
    pub const STRUCTURED_ADVANCED: usize = 10;
    /// Insert statements emitted per tier in the migration.
    pub const MIGRATION_PER_TIER: usize = 10;
}

/// Presentation thresholds exported next to the sentence data.
///
/// These grade a learner's score in the front end and are unrelated to the
/// classifier thresholds even where the numbers coincide.
pub mod benchmarks {
    /// 90% and above.
    pub const EXCELLENT: f64 = 0.9;
    /// 80-89%.
    pub const GOOD: f64 = 0.8;
    /// 70-79%.
    pub const FAIR: f64 = 0.7;
    /// 60-69%.
    pub const NEEDS_PRACTICE: f64 = 0.6;
}

/// Default artifact locations, relative to the working directory.
pub mod output {
    /// Front-end TypeScript data file.
    pub const STRUCTURED_DATA_PATH: &str = "data/speechocean-sentences.ts";
    /// SQL seed migration.
    pub const MIGRATION_PATH: &str = "supabase/migrations/001_add_speechocean_sentences.sql";
    /// Table created and seeded by the migration.
    pub const TABLE_NAME: &str = "practice_sentences";
}

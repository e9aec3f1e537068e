use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{DatasetConfig, OutputPaths, PipelineConfig};
use crate::constants::dataset::{DATASET_ID, DATASET_SPLIT};
use crate::constants::output::{MIGRATION_PATH, STRUCTURED_DATA_PATH};
use crate::errors::SeedError;
use crate::pipeline::{RunOutcome, run};
use crate::source::{RecordSource, SnapshotSource};

#[derive(Debug, Parser)]
#[command(
    name = "speechocean-seed",
    disable_help_subcommand = true,
    about = "Build practice sentence artifacts from speechocean762",
    long_about = "Download the speechocean762 dataset, bucket its sentences into beginner/intermediate/advanced tiers, and write a TypeScript data file plus a SQL seed migration.",
    after_help = "With no arguments the dataset is fetched from the Hugging Face hub and both artifacts are written to their default paths."
)]
struct SeedCli {
    #[arg(
        long,
        default_value = DATASET_ID,
        help = "Hugging Face dataset id to fetch"
    )]
    dataset: String,
    #[arg(long, default_value = DATASET_SPLIT, help = "Dataset split to read")]
    split: String,
    #[arg(
        long = "snapshot-dir",
        value_name = "DIR",
        help = "Read shard files from a local directory instead of the hub"
    )]
    snapshot_dir: Option<PathBuf>,
    #[arg(
        long = "max-rows",
        value_parser = parse_positive_usize,
        help = "Optional cap on rows read from the dataset"
    )]
    max_rows: Option<usize>,
    #[arg(
        long = "data-out",
        value_name = "PATH",
        default_value = STRUCTURED_DATA_PATH,
        help = "Output path for the TypeScript data file"
    )]
    data_out: PathBuf,
    #[arg(
        long = "migration-out",
        value_name = "PATH",
        default_value = MIGRATION_PATH,
        help = "Output path for the SQL migration"
    )]
    migration_out: PathBuf,
}

impl SeedCli {
    fn pipeline_config(&self) -> PipelineConfig {
        let dataset = DatasetConfig {
            dataset: self.dataset.clone(),
            split: self.split.clone(),
            max_rows: self.max_rows,
            ..DatasetConfig::default()
        };
        PipelineConfig {
            dataset,
            outputs: OutputPaths {
                structured_data: self.data_out.clone(),
                migration: self.migration_out.clone(),
            },
            ..PipelineConfig::default()
        }
    }

    fn source(&self, dataset: DatasetConfig) -> Result<Box<dyn RecordSource>, SeedError> {
        if let Some(dir) = &self.snapshot_dir {
            return Ok(Box::new(SnapshotSource::new(dataset, dir.clone())));
        }
        hub_source(dataset)
    }
}

#[cfg(feature = "huggingface")]
fn hub_source(dataset: DatasetConfig) -> Result<Box<dyn RecordSource>, SeedError> {
    Ok(Box::new(crate::source::HuggingFaceSource::new(dataset)))
}

#[cfg(not(feature = "huggingface"))]
fn hub_source(_dataset: DatasetConfig) -> Result<Box<dyn RecordSource>, SeedError> {
    Err(SeedError::Configuration(
        "built without the `huggingface` feature; pass --snapshot-dir".to_string(),
    ))
}

/// Entry point behind the `speechocean-seed` binary.
///
/// Returns a failing exit code when the dataset could not be fetched, so
/// callers can tell "nothing produced" apart from a completed run.
pub fn run_seed<I>(args_iter: I) -> Result<ExitCode, Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let Some(cli) = parse_cli::<SeedCli, _>(
        std::iter::once("speechocean-seed".to_string()).chain(args_iter),
    )?
    else {
        return Ok(ExitCode::SUCCESS);
    };

    let config = cli.pipeline_config();
    let source = cli.source(config.dataset.clone())?;
    info!(
        dataset = %config.dataset.dataset,
        split = %config.dataset.split,
        "starting speechocean762 processing"
    );

    match run(&config, source.as_ref())? {
        RunOutcome::Completed(report) => {
            println!(
                "Wrote {} sentences ({} beginner, {} intermediate, {} advanced) to:",
                report.classified.total(),
                report.classified.beginner,
                report.classified.intermediate,
                report.classified.advanced
            );
            for path in &report.written {
                println!("  {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::NoDataset { .. } => {
            eprintln!("No dataset available; nothing was written.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("Could not parse --max-rows value '{raw}' as a positive integer"))?;
    if parsed == 0 {
        return Err("--max-rows must be greater than zero".to_string());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SeedCli {
        SeedCli::try_parse_from(std::iter::once("speechocean-seed").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_arguments_use_fixed_defaults() {
        let config = parse(&[]).pipeline_config();
        assert_eq!(config.dataset.dataset, "mispeech/speechocean762");
        assert_eq!(config.dataset.split, "test");
        assert_eq!(config.dataset.max_rows, None);
        assert_eq!(
            config.outputs.structured_data,
            PathBuf::from("data/speechocean-sentences.ts")
        );
        assert_eq!(
            config.outputs.migration,
            PathBuf::from("supabase/migrations/001_add_speechocean_sentences.sql")
        );
        assert_eq!(config.source_label, "speechocean762");
    }

    #[test]
    fn overrides_flow_into_config() {
        let cli = parse(&[
            "--split",
            "train",
            "--max-rows",
            "5",
            "--data-out",
            "/tmp/out.ts",
            "--snapshot-dir",
            "/tmp/snap",
        ]);
        let config = cli.pipeline_config();
        assert_eq!(config.dataset.split, "train");
        assert_eq!(config.dataset.max_rows, Some(5));
        assert_eq!(config.outputs.structured_data, PathBuf::from("/tmp/out.ts"));
        assert_eq!(cli.snapshot_dir, Some(PathBuf::from("/tmp/snap")));
    }

    #[test]
    fn zero_max_rows_is_rejected() {
        let err = SeedCli::try_parse_from(["speechocean-seed", "--max-rows", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn help_is_not_an_error() {
        let parsed =
            parse_cli::<SeedCli, _>(["speechocean-seed".to_string(), "--help".to_string()])
                .unwrap();
        assert!(parsed.is_none());
    }
}

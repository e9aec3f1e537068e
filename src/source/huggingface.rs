use hf_hub::api::sync::{Api, ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::DatasetConfig;
use crate::errors::SeedError;
use crate::types::{RemotePath, Row};

use super::RecordSource;
use super::shards::{has_accepted_extension, matches_split, read_rows};

/// Dataset split downloaded from the Hugging Face hub.
///
/// Shards are fetched through the hub's local file cache and read in sorted
/// remote-path order. One attempt is made per shard; the first failure aborts
/// the whole fetch.
pub struct HuggingFaceSource {
    config: DatasetConfig,
    cache_dir: Option<PathBuf>,
}

impl HuggingFaceSource {
    /// Source for the dataset and split named in `config`, using the default cache.
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            cache_dir: None,
        }
    }

    /// Use `cache_dir` instead of the default hub cache location.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    fn api(&self) -> Result<Api, SeedError> {
        let mut builder = ApiBuilder::new().with_progress(false).with_token(None);
        if let Some(cache_dir) = &self.cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        builder.build().map_err(|err| SeedError::SourceUnavailable {
            source_id: self.config.source_id.clone(),
            reason: format!("failed building hf-hub client: {err}"),
        })
    }

    fn list_remote_shards(&self, repo_api: &ApiRepo) -> Result<Vec<RemotePath>, SeedError> {
        info!(dataset = %self.config.dataset, "reading remote file list");
        let info = repo_api
            .info()
            .map_err(|err| SeedError::SourceUnavailable {
                source_id: self.config.source_id.clone(),
                reason: format!(
                    "failed reading hf-hub repository info for '{}': {err}",
                    self.config.dataset
                ),
            })?;
        select_split_shards(
            &self.config,
            info.siblings.into_iter().map(|sibling| sibling.rfilename),
        )
    }

    fn download_shard(&self, repo_api: &ApiRepo, remote_path: &str) -> Result<PathBuf, SeedError> {
        let mut local_cached =
            repo_api
                .get(remote_path)
                .map_err(|err| SeedError::SourceUnavailable {
                    source_id: self.config.source_id.clone(),
                    reason: format!("failed downloading '{remote_path}' from hf-hub: {err}"),
                })?;
        if !local_cached.exists() {
            local_cached =
                repo_api
                    .download(remote_path)
                    .map_err(|err| SeedError::SourceUnavailable {
                        source_id: self.config.source_id.clone(),
                        reason: format!(
                            "hf-hub returned missing cache path for '{remote_path}', and forced download failed: {err}"
                        ),
                    })?;
        }
        if !local_cached.exists() {
            return Err(SeedError::SourceUnavailable {
                source_id: self.config.source_id.clone(),
                reason: format!(
                    "hf-hub returned non-existent cache file for '{remote_path}' at {}",
                    local_cached.display()
                ),
            });
        }
        debug!(remote = remote_path, local = %local_cached.display(), "shard cached");
        Ok(local_cached)
    }
}

impl RecordSource for HuggingFaceSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn fetch(&self) -> Result<Vec<Row>, SeedError> {
        info!(
            dataset = %self.config.dataset,
            split = %self.config.split,
            "downloading dataset"
        );
        let api = self.api()?;
        let repo_api = api.repo(Repo::new(self.config.dataset.clone(), RepoType::Dataset));

        let remote_shards = self.list_remote_shards(&repo_api)?;
        let mut local_shards = Vec::with_capacity(remote_shards.len());
        for remote_path in &remote_shards {
            local_shards.push(self.download_shard(&repo_api, remote_path)?);
        }
        read_rows(&self.config.source_id, &local_shards, self.config.max_rows)
    }
}

/// Pick the repository files that are shards of the configured split, sorted.
pub fn select_split_shards<I>(config: &DatasetConfig, files: I) -> Result<Vec<RemotePath>, SeedError>
where
    I: IntoIterator<Item = RemotePath>,
{
    let accepted = config.accepted_extensions();
    let mut candidates: Vec<RemotePath> = files
        .into_iter()
        .filter(|remote_path| matches_split(remote_path, &config.split))
        .filter(|remote_path| has_accepted_extension(Path::new(remote_path), &accepted))
        .collect();
    candidates.sort();
    info!(
        extensions = ?config.shard_extensions,
        count = candidates.len(),
        "remote shard candidates"
    );

    if candidates.is_empty() {
        return Err(SeedError::SourceUnavailable {
            source_id: config.source_id.clone(),
            reason: format!(
                "no remote shard files found for dataset '{}' split '{}' with extensions {:?}",
                config.dataset, config.split, config.shard_extensions
            ),
        });
    }
    Ok(candidates)
}

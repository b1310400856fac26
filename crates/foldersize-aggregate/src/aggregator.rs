//! Folder size aggregation over a repository.

use std::time::Instant;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use foldersize_core::{
    AggregateError, AggregationResult, AssetQuery, FolderPath, FolderSizeReport, RepositoryError,
    ResourceTree,
};

use crate::accumulate::Accumulator;

/// Configuration for aggregation runs.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct AggregateConfig {
    /// Maximum number of skipped-record warnings kept in a report.
    ///
    /// Every skipped record is still logged and counted in the run stats.
    #[builder(default = "100")]
    pub max_warnings: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self { max_warnings: 100 }
    }
}

impl AggregateConfig {
    /// Create a new config builder.
    pub fn builder() -> AggregateConfigBuilder {
        AggregateConfigBuilder::default()
    }
}

/// Seed one zeroed bucket per immediate child folder of `target`.
///
/// Children of any other kind get no bucket.
pub fn initialize_buckets<T>(
    tree: &T,
    target: &FolderPath,
) -> Result<AggregationResult, RepositoryError>
where
    T: ResourceTree + ?Sized,
{
    let mut result = AggregationResult::new();
    for child in tree.list_children(target)? {
        if child.is_folder() {
            result.seed(child.path);
        }
    }
    Ok(result)
}

/// Computes per-child-folder asset statistics.
pub struct FolderSizeAggregator<R> {
    repository: R,
    config: AggregateConfig,
}

impl<R> FolderSizeAggregator<R>
where
    R: ResourceTree + AssetQuery,
{
    /// Create an aggregator with default config.
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, AggregateConfig::default())
    }

    /// Create an aggregator with custom config.
    pub fn with_config(repository: R, config: AggregateConfig) -> Self {
        Self { repository, config }
    }

    /// The repository this aggregator reads from.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Aggregate the descendants of `target` into its child folders.
    ///
    /// Fails if the target is missing or not a folder, or if listing or
    /// scanning fails. Records with paths outside the target are skipped
    /// and reported as warnings.
    pub fn run(&self, target: &FolderPath) -> Result<FolderSizeReport, AggregateError> {
        let start = Instant::now();

        let listing_error = |source| AggregateError::Listing {
            path: target.clone(),
            source,
        };
        match self.repository.kind(target).map_err(listing_error)? {
            None => {
                return Err(AggregateError::NotFound {
                    path: target.clone(),
                });
            }
            Some(kind) if !kind.is_folder() => {
                return Err(AggregateError::NotAFolder {
                    path: target.clone(),
                });
            }
            Some(_) => {}
        }

        let buckets = initialize_buckets(&self.repository, target).map_err(listing_error)?;
        debug!(target: "foldersize::aggregate", "{} buckets under {target}", buckets.len());

        let scan_error = |source| AggregateError::ScanFailure {
            path: target.clone(),
            source,
        };
        let mut accumulator =
            Accumulator::new(target.clone(), buckets).with_max_warnings(self.config.max_warnings);
        for asset in self.repository.scan_descendants(target).map_err(scan_error)? {
            accumulator.add(&asset.map_err(scan_error)?);
        }

        let report = accumulator.finish(start.elapsed());
        info!(
            target: "foldersize::aggregate",
            "aggregated {target}: {} scanned, {} bucketed, {} unbucketed, {} malformed in {:?}",
            report.stats.assets_scanned,
            report.stats.assets_bucketed,
            report.stats.assets_unbucketed,
            report.stats.assets_malformed,
            report.stats.duration,
        );
        Ok(report)
    }
}

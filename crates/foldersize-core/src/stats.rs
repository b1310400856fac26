//! Per-bucket accumulators and the aggregation result.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AggregateWarning;
use crate::path::FolderPath;

/// Path of an immediate child folder of the target.
pub type BucketKey = FolderPath;

/// Counters for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    /// Every asset resolved into this bucket.
    pub total_assets: u64,
    /// Assets that carried size metadata.
    pub counted_assets: u64,
    /// Sum of the sizes of the counted assets.
    #[serde(rename = "size")]
    pub size_bytes: u64,
}

impl BucketStats {
    /// Create zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one asset.
    pub fn record(&mut self, size_bytes: Option<u64>) {
        self.total_assets = self.total_assets.saturating_add(1);
        if let Some(size) = size_bytes {
            self.counted_assets = self.counted_assets.saturating_add(1);
            self.size_bytes = self.size_bytes.saturating_add(size);
        }
    }

    /// Assets recorded without size metadata.
    pub fn uncounted_assets(&self) -> u64 {
        self.total_assets.saturating_sub(self.counted_assets)
    }

    /// Check if the size covers every asset in the bucket.
    pub fn is_exact(&self) -> bool {
        self.counted_assets == self.total_assets
    }

    /// Add another bucket's counters to this one.
    pub fn merge(&mut self, other: &BucketStats) {
        self.total_assets = self.total_assets.saturating_add(other.total_assets);
        self.counted_assets = self.counted_assets.saturating_add(other.counted_assets);
        self.size_bytes = self.size_bytes.saturating_add(other.size_bytes);
    }
}

/// Bucket stats keyed by child folder path.
///
/// Serializes as a bare JSON object, keys in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationResult {
    buckets: BTreeMap<BucketKey, BucketStats>,
}

impl AggregationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a zeroed bucket unless one already exists.
    pub fn seed(&mut self, key: BucketKey) {
        self.buckets.entry(key).or_default();
    }

    /// Stats for a bucket.
    pub fn get(&self, key: &BucketKey) -> Option<&BucketStats> {
        self.buckets.get(key)
    }

    /// Mutable stats for a bucket.
    pub fn get_mut(&mut self, key: &BucketKey) -> Option<&mut BucketStats> {
        self.buckets.get_mut(key)
    }

    /// Check if a bucket exists.
    pub fn contains(&self, key: &BucketKey) -> bool {
        self.buckets.contains_key(key)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate over buckets in path order.
    pub fn iter(&self) -> btree_map::Iter<'_, BucketKey, BucketStats> {
        self.buckets.iter()
    }

    /// Sum of all buckets.
    pub fn total(&self) -> BucketStats {
        self.buckets.values().fold(BucketStats::new(), |mut acc, stats| {
            acc.merge(stats);
            acc
        })
    }
}

impl<'a> IntoIterator for &'a AggregationResult {
    type Item = (&'a BucketKey, &'a BucketStats);
    type IntoIter = btree_map::Iter<'a, BucketKey, BucketStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

impl IntoIterator for AggregationResult {
    type Item = (BucketKey, BucketStats);
    type IntoIter = btree_map::IntoIter<BucketKey, BucketStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

impl FromIterator<(BucketKey, BucketStats)> for AggregationResult {
    fn from_iter<T: IntoIterator<Item = (BucketKey, BucketStats)>>(iter: T) -> Self {
        Self {
            buckets: iter.into_iter().collect(),
        }
    }
}

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Asset records read from the scan.
    pub assets_scanned: u64,
    /// Records added to a bucket.
    pub assets_bucketed: u64,
    /// Records that resolved to no initialized bucket.
    pub assets_unbucketed: u64,
    /// Records whose path was not below the target.
    pub assets_malformed: u64,
    /// Wall time of the run.
    pub duration: Duration,
}

/// Complete outcome of one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSizeReport {
    /// Folder the run was made for.
    pub target: FolderPath,
    /// Per-child-folder stats.
    pub buckets: AggregationResult,
    /// Run counters.
    pub stats: RunStats,
    /// Records skipped with a warning.
    pub warnings: Vec<AggregateWarning>,
}

impl FolderSizeReport {
    /// Check if any records were skipped with a warning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

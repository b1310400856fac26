//! Folding scanned assets into bucket counters.

use std::time::Duration;

use tracing::warn;

use foldersize_core::{
    AggregateWarning, AggregationResult, AssetRecord, BucketKey, FolderPath, FolderSizeReport,
    MalformedPathError, RunStats,
};

use crate::resolve::resolve_bucket;

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accumulation {
    /// Counted in this bucket.
    Bucketed(BucketKey),
    /// Resolved to a key with no initialized bucket; not counted.
    Unbucketed(BucketKey),
    /// Path not below the target; not counted.
    Malformed(MalformedPathError),
}

/// Add one asset to the bucket it resolves to.
///
/// Assets whose key has no entry in `result` are skipped without touching
/// any counter.
pub fn accumulate(
    result: &mut AggregationResult,
    target: &FolderPath,
    asset: &AssetRecord,
) -> Accumulation {
    let key = match resolve_bucket(target, &asset.path) {
        Ok(key) => key,
        Err(err) => return Accumulation::Malformed(err),
    };

    match result.get_mut(&key) {
        Some(stats) => {
            stats.record(asset.size_bytes);
            Accumulation::Bucketed(key)
        }
        None => Accumulation::Unbucketed(key),
    }
}

/// Owned accumulator for a single run, finalized into a report.
#[derive(Debug)]
pub struct Accumulator {
    target: FolderPath,
    buckets: AggregationResult,
    stats: RunStats,
    warnings: Vec<AggregateWarning>,
    max_warnings: usize,
}

impl Accumulator {
    /// Start accumulating into freshly initialized buckets.
    pub fn new(target: FolderPath, buckets: AggregationResult) -> Self {
        Self {
            target,
            buckets,
            stats: RunStats::default(),
            warnings: Vec::new(),
            max_warnings: usize::MAX,
        }
    }

    /// Cap the number of warnings kept; further ones are only counted.
    pub fn with_max_warnings(mut self, max_warnings: usize) -> Self {
        self.max_warnings = max_warnings;
        self
    }

    /// Add one asset.
    pub fn add(&mut self, asset: &AssetRecord) -> Accumulation {
        self.stats.assets_scanned += 1;

        let outcome = accumulate(&mut self.buckets, &self.target, asset);
        match &outcome {
            Accumulation::Bucketed(_) => self.stats.assets_bucketed += 1,
            Accumulation::Unbucketed(_) => self.stats.assets_unbucketed += 1,
            Accumulation::Malformed(err) => {
                self.stats.assets_malformed += 1;
                warn!(target: "foldersize::aggregate", "skipping asset: {err}");
                if self.warnings.len() < self.max_warnings {
                    self.warnings.push(err.clone().into());
                }
            }
        }
        outcome
    }

    /// Counters so far.
    pub fn buckets(&self) -> &AggregationResult {
        &self.buckets
    }

    /// Finish the run.
    pub fn finish(mut self, duration: Duration) -> FolderSizeReport {
        self.stats.duration = duration;
        FolderSizeReport {
            target: self.target,
            buckets: self.buckets,
            stats: self.stats,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> FolderPath {
        FolderPath::parse(s).unwrap()
    }

    fn seeded(target: &FolderPath, children: &[&str]) -> AggregationResult {
        let mut result = AggregationResult::new();
        for child in children {
            result.seed(target.join(child).unwrap());
        }
        result
    }

    #[test]
    fn test_accumulate_counts_size_only_when_present() {
        let target = p("/content/dam/foo");
        let mut result = seeded(&target, &["a"]);

        let sized = AssetRecord::sized(p("/content/dam/foo/a/1.jpg"), 10);
        let bare = AssetRecord::without_size(p("/content/dam/foo/a/2.jpg"));
        accumulate(&mut result, &target, &sized);
        accumulate(&mut result, &target, &bare);

        let stats = result.get(&p("/content/dam/foo/a")).unwrap();
        assert_eq!(stats.total_assets, 2);
        assert_eq!(stats.counted_assets, 1);
        assert_eq!(stats.size_bytes, 10);
    }

    #[test]
    fn test_accumulate_skips_unknown_bucket() {
        let target = p("/content/dam/foo");
        let mut result = seeded(&target, &["a"]);
        let before = result.clone();

        let outcome = accumulate(
            &mut result,
            &target,
            &AssetRecord::sized(p("/content/dam/foo/file.txt/inner.jpg"), 99),
        );
        assert_eq!(
            outcome,
            Accumulation::Unbucketed(p("/content/dam/foo/file.txt"))
        );

        let loose = AssetRecord::sized(p("/content/dam/foo/x.jpg"), 5);
        let outcome = accumulate(&mut result, &target, &loose);
        assert_eq!(outcome, Accumulation::Unbucketed(target.clone()));

        assert_eq!(result, before);
    }

    #[test]
    fn test_accumulator_tracks_outcomes() {
        let target = p("/content/dam/foo");
        let mut acc =
            Accumulator::new(target.clone(), seeded(&target, &["a"])).with_max_warnings(1);

        acc.add(&AssetRecord::sized(p("/content/dam/foo/a/1.jpg"), 1));
        acc.add(&AssetRecord::sized(p("/content/dam/foo/2.jpg"), 1));
        acc.add(&AssetRecord::sized(p("/etc/3.jpg"), 1));
        acc.add(&AssetRecord::sized(p("/etc/4.jpg"), 1));

        let report = acc.finish(Duration::from_millis(3));
        assert_eq!(report.stats.assets_scanned, 4);
        assert_eq!(report.stats.assets_bucketed, 1);
        assert_eq!(report.stats.assets_unbucketed, 1);
        assert_eq!(report.stats.assets_malformed, 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.stats.duration, Duration::from_millis(3));
        assert_eq!(report.target, target);
    }
}

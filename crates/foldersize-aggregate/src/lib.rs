//! Per-child-folder asset aggregation for foldersize.
//!
//! Given a target folder, every asset anywhere below it is attributed to the
//! immediate child folder of the target that contains it. Each child folder
//! gets three counters: all assets, assets with size metadata, and the sum
//! of those sizes.
//!
//! The run happens in three steps:
//!
//! 1. Seed one zeroed bucket per child folder ([`initialize_buckets`])
//! 2. Stream every descendant asset from the repository
//! 3. Resolve each asset to a bucket ([`resolve_bucket`]) and count it
//!    ([`accumulate`])
//!
//! Assets that resolve to no seeded bucket are skipped. This includes
//! assets stored directly in the target folder.
//!
//! ```rust,ignore
//! use foldersize_aggregate::FolderSizeAggregator;
//! use foldersize_repo::MemoryRepository;
//!
//! let repo = MemoryRepository::from_snapshot_file("dam.json")?;
//! let report = FolderSizeAggregator::new(&repo).run(&"/content/dam/foo".parse()?)?;
//!
//! for (folder, stats) in &report.buckets {
//!     println!("{folder}: {} assets, {} bytes", stats.total_assets, stats.size_bytes);
//! }
//! ```

mod accumulate;
mod aggregator;
mod resolve;

pub use accumulate::{Accumulation, Accumulator, accumulate};
pub use aggregator::{
    AggregateConfig, AggregateConfigBuilder, FolderSizeAggregator, initialize_buckets,
};
pub use resolve::resolve_bucket;

// Re-export core types
pub use foldersize_core::{
    AggregateError, AggregationResult, AssetRecord, BucketKey, BucketStats, FolderPath,
    FolderSizeReport, MalformedPathError, RunStats,
};

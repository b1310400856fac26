//! foldersize - per-child-folder asset counts and sizes for content repositories.
//!
//! Usage:
//!   foldersize serve               Serve GET /<folder>.size.json
//!   foldersize size <FOLDER>       Print the stats of one folder
//!   foldersize export <DIR>        Export a directory tree as a JSON snapshot
//!   foldersize --help              Show help

mod config;
mod logging;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::debug;

use foldersize_aggregate::{FolderPath, FolderSizeAggregator, FolderSizeReport};
use foldersize_core::FsRepoConfig;
use foldersize_repo::{FsRepository, Snapshot};

use crate::config::{AppConfig, RepositorySource};

#[derive(Parser)]
#[command(
    name = "foldersize",
    version,
    about = "Per-child-folder asset counts and sizes for content repositories",
    long_about = "foldersize reports, for every immediate child folder of a folder, how many \
                  assets live below it, how many of them carry size metadata and their \
                  total size.\n\n\
                  Run `foldersize serve` to expose the numbers over HTTP, or `foldersize \
                  size <FOLDER>` for a one-off report."
)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides the config file (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve folder sizes over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,

        /// Selector in /<folder>.<selector>.json
        #[arg(short, long)]
        selector: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the stats of one folder
    Size {
        /// Repository path of the folder, e.g. /content/dam/foo
        folder: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Export a directory tree as a JSON snapshot
    Export {
        /// Directory to export
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Repository selection shared by subcommands.
#[derive(Args)]
struct SourceArgs {
    /// Serve this directory as the repository root
    #[arg(long, conflicts_with = "snapshot")]
    root: Option<PathBuf>,

    /// Load the repository from a JSON snapshot
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Glob pattern of entry names to hide (filesystem backend, repeatable)
    #[arg(long = "ignore")]
    ignore_patterns: Vec<String>,
}

impl SourceArgs {
    /// Apply command-line overrides to the configured source.
    fn resolve(self, configured: RepositorySource) -> RepositorySource {
        let source = match (self.root, self.snapshot) {
            (Some(root), _) => RepositorySource::Filesystem(FsRepoConfig::new(root)),
            (None, Some(path)) => RepositorySource::Snapshot { path },
            (None, None) => configured,
        };

        match source {
            RepositorySource::Filesystem(mut fs) if !self.ignore_patterns.is_empty() => {
                fs.ignore_patterns.extend(self.ignore_patterns);
                RepositorySource::Filesystem(fs)
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    logging::init(&config.log_level)?;
    debug!("configuration: {config:?}");

    match cli.command {
        Command::Serve {
            bind,
            selector,
            source,
        } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(selector) = selector {
                foldersize_server::validate_selector(&selector)
                    .map_err(color_eyre::eyre::Report::msg)?;
                config.server.selector = selector;
            }
            let source = source.resolve(config.repository.clone());
            run_serve(config, source)?;
        }
        Command::Size {
            folder,
            format,
            source,
        } => {
            let source = source.resolve(config.repository.clone());
            run_size(&folder, &source, &config, format)?;
        }
        Command::Export { path, output } => {
            run_export(&path, output)?;
        }
    }

    Ok(())
}

/// Serve folder sizes until Ctrl-C.
fn run_serve(config: AppConfig, source: RepositorySource) -> Result<()> {
    let repository = source.open()?;
    debug!("repository opened from {source:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(foldersize_server::serve(
        config.server,
        config.aggregate,
        repository,
    ))?;

    Ok(())
}

/// Compute and print the stats of one folder.
fn run_size(
    folder: &str,
    source: &RepositorySource,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<()> {
    let target: FolderPath = folder.parse().context("Invalid folder path")?;
    let repository = source.open()?;

    let report = FolderSizeAggregator::with_config(repository, config.aggregate.clone())
        .run(&target)
        .with_context(|| format!("Cannot compute size of {target}"))?;

    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.buckets)?),
    }

    if report.has_warnings() {
        eprintln!();
        eprintln!("{} record(s) skipped:", report.stats.assets_malformed);
        for warning in &report.warnings {
            eprintln!("  {}", warning.message);
        }
    }

    Ok(())
}

/// Export a directory tree as a snapshot.
fn run_export(path: &Path, output: Option<PathBuf>) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;

    eprintln!("Exporting {}...", path.display());

    let repo = FsRepository::open(FsRepoConfig::new(&path)).context("Cannot open directory")?;
    let snapshot = Snapshot::capture(&repo, &FolderPath::root()).context("Export failed")?;
    let json = snapshot.to_json()?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            eprintln!(
                "Exported {} nodes to {}",
                snapshot.nodes.len(),
                output_path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

/// Print a report as a table, largest folders first.
fn print_report(report: &FolderSizeReport) {
    let total = report.buckets.total();

    println!();
    println!("{}", "─".repeat(70));
    println!(
        " {} - {} in {} folder(s)",
        report.target,
        format_size(total.size_bytes),
        report.buckets.len()
    );
    println!(
        " {} assets, {} with size metadata",
        total.total_assets, total.counted_assets
    );
    println!(" Computed in {:.2}s", report.stats.duration.as_secs_f64());
    println!("{}", "─".repeat(70));
    println!();

    if report.buckets.is_empty() {
        println!(" No child folders.");
        return;
    }

    let mut rows: Vec<_> = report.buckets.iter().collect();
    rows.sort_by(|a, b| b.1.size_bytes.cmp(&a.1.size_bytes));

    for (folder, stats) in rows {
        let name = folder.name().unwrap_or("/");
        // "~" marks sizes that miss assets without size metadata
        let marker = if stats.is_exact() { " " } else { "~" };
        println!(
            " {:<40} {:>8} assets {}{:>10}",
            truncate(name, 40),
            stats.total_assets,
            marker,
            format_size(stats.size_bytes)
        );
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{head}…")
    }
}

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Attribute artifact vulnerabilities to the source repositories that built them
#[derive(Parser, Debug)]
#[command(name = "repo-vuln")]
#[command(version)]
#[command(
    about = "Attribute artifact vulnerabilities to the source repositories that built them",
    long_about = None
)]
pub struct Args {
    /// Path to a config file (defaults to ./repo-vuln.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Vulnerability feed for a single-product run (JSON array of artifact entries)
    #[arg(long, value_name = "FILE", requires = "repositories")]
    pub feed: Option<PathBuf>,

    /// Known repositories for a single-product run (JSON array of repository records)
    #[arg(long, value_name = "FILE", requires = "feed")]
    pub repositories: Option<PathBuf>,

    /// Product name. With --feed, names the run; otherwise selects a configured product
    #[arg(short, long)]
    pub product: Option<String>,

    /// Directory holding the per-product metadata cache files
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Artifactory base URL (e.g., https://artifactory.example.com)
    #[arg(long, value_name = "URL", conflicts_with = "offline")]
    pub registry_url: Option<String>,

    /// Never query the registry; match on feed properties and cached metadata only
    #[arg(long)]
    pub offline: bool,

    /// Disable case and separator insensitive matching
    #[arg(long)]
    pub no_fuzzy: bool,

    /// Only query the registry for artifacts stored in local repositories
    #[arg(long)]
    pub local_only: bool,

    /// Artifacts per registry query
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 1 when any artifact could not be attributed
    #[arg(long)]
    pub strict: bool,

    /// Suppress progress output on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter used when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

//! repo-vuln - attribute artifact vulnerabilities to source repositories
//!
//! This library takes a per-product feed of deployed artifacts with their
//! vulnerability counts, works out which source repository built each one
//! (from feed properties or Artifactory build metadata), and aggregates the
//! counts per repository. It follows hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`vulnerability_matching`): Pure matching logic and domain models
//! - **Application Layer** (`application`): Use cases, metadata cache and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use repo_vuln::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let use_case = MatchVulnerabilitiesUseCase::new(
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     OfflineRegistry,
//!     JsonCacheStore::new(".aql-cache"),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = MatchRequest::new(
//!     "diagnostics",
//!     PathBuf::from("feed.json"),
//!     PathBuf::from("repos.json"),
//!     MatchOptions::default(),
//! );
//! let report = use_case.execute(request)?;
//!
//! let output = JsonReportFormatter::new().format(&RunReport::new(vec![report]))?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod shared;
pub mod vulnerability_matching;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, JsonCacheStore, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::JsonReportFormatter;
    pub use crate::adapters::outbound::network::{
        ArtifactoryClient, ArtifactorySettings, OfflineRegistry,
    };
    pub use crate::application::cache::{AqlMetadataCache, CacheStats};
    pub use crate::application::dto::{MatchOptions, MatchRequest, ProductReport, RunReport};
    pub use crate::application::use_cases::{run_products, MatchVulnerabilitiesUseCase};
    pub use crate::ports::inbound::VulnerabilityMatchingPort;
    pub use crate::ports::outbound::{
        CacheStore, OutputPresenter, ProgressReporter, RegistryMetadataSource, ReportFormatter,
        RepositoryListReader, VulnerabilityFeedReader,
    };
    pub use crate::vulnerability_matching::domain::{
        ArtifactKey, ArtifactRecord, BuildMetadata, MatchResult, RepoId, RepositoryIndex,
        RepositoryRecord, SeverityCounts,
    };
    pub use crate::vulnerability_matching::services::{
        BuildNameExtractor, RepositoryMatcher, VulnerabilityAggregator,
    };
    pub use crate::shared::Result;
}

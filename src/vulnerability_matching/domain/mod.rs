pub mod artifact;
pub mod build_metadata;
pub mod feed_entry;
pub mod match_result;
pub mod repository;
pub mod severity;

pub use artifact::{ArtifactKey, ArtifactLocation, ArtifactRecord, Properties, Property};
pub use build_metadata::{compare_build_timestamps, BuildMetadata, CacheEntry};
pub use feed_entry::{RawArtifactEntry, RawProperty, RawSeverityCounts};
pub use match_result::{AmbiguousMatch, MatchResult, MatchTier, UnmatchedReason};
pub use repository::{PublishLayout, RepoId, RepositoryIndex, RepositoryRecord};
pub use severity::SeverityCounts;

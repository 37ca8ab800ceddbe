pub mod artifact_normalizer;
pub mod build_name_extractor;
pub mod repository_matcher;
pub mod vulnerability_aggregator;

pub use artifact_normalizer::{ArtifactNormalizer, NormalizationError, NormalizedFeed, RejectedEntry};
pub use build_name_extractor::{BuildNameExtractor, ExtractedName, ExtractionConfidence, ExtractionFailure};
pub use repository_matcher::{RepositoryMatcher, DEFAULT_BUILD_NAME_PROPERTIES};
pub use vulnerability_aggregator::{
    AggregatedArtifact, MatchedArtifact, RepositoryTotals, VulnerabilityAggregator,
};

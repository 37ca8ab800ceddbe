use crate::application::cache::CacheStats;
use crate::vulnerability_matching::domain::{
    AmbiguousMatch, ArtifactKey, RepoId, SeverityCounts, UnmatchedReason,
};
use crate::vulnerability_matching::services::{RejectedEntry, RepositoryTotals};
use serde::Serialize;
use std::collections::BTreeMap;

/// An artifact no repository could be attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedArtifact {
    pub artifact_key: ArtifactKey,
    /// Registry storage repository
    pub repo_name: String,
    pub build_name: Option<String>,
    pub severities: SeverityCounts,
    #[serde(flatten)]
    pub reason: UnmatchedReason,
}

/// An artifact attributed to the first of several qualifying repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousArtifact {
    pub artifact_key: ArtifactKey,
    #[serde(flatten)]
    pub ambiguity: AmbiguousMatch,
}

/// Counters for one product run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub artifacts: usize,
    pub matched: usize,
    pub ambiguous: usize,
    pub unmatched: usize,
    pub rejected: usize,
    /// Artifacts never sent to the registry (non-local or unlocatable keys)
    pub registry_skipped: usize,
    pub cache: CacheStats,
}

/// ProductReport - matching outcome for one product
///
/// `totals` includes ambiguous artifacts under their chosen repository.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReport {
    pub product: String,
    pub totals: BTreeMap<RepoId, RepositoryTotals>,
    pub unmatched: Vec<UnmatchedArtifact>,
    pub ambiguous: Vec<AmbiguousArtifact>,
    pub rejected: Vec<RejectedEntry>,
    pub stats: RunStatistics,
}

impl ProductReport {
    pub fn has_unmatched(&self) -> bool {
        !self.unmatched.is_empty()
    }

    /// Sum over every attributed repository
    pub fn grand_total(&self) -> SeverityCounts {
        self.totals.values().map(|repo| repo.totals).sum()
    }
}

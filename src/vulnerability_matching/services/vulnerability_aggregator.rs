use crate::vulnerability_matching::domain::{ArtifactKey, ArtifactRecord, RepoId, RepositoryIndex, SeverityCounts};
use crate::vulnerability_matching::policies::TopLevelCounts;
use serde::Serialize;
use std::collections::BTreeMap;

/// An artifact attributed to a repository by the matcher.
#[derive(Debug, Clone)]
pub struct MatchedArtifact {
    pub record: ArtifactRecord,
    pub repo_id: RepoId,
    /// Name the matcher resolved the artifact under
    pub matched_name: String,
}

impl MatchedArtifact {
    pub fn new(record: ArtifactRecord, repo_id: RepoId, matched_name: impl Into<String>) -> Self {
        Self {
            record,
            repo_id,
            matched_name: matched_name.into(),
        }
    }
}

/// Per-artifact summary kept in a repository's totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedArtifact {
    pub artifact_key: ArtifactKey,
    pub matched_name: String,
    pub build_name: Option<String>,
    pub build_number: Option<String>,
    pub build_timestamp: Option<String>,
    pub severities: SeverityCounts,
    pub is_latest_tag: bool,
}

impl AggregatedArtifact {
    fn from_matched(matched: &MatchedArtifact) -> Self {
        let record = &matched.record;
        Self {
            artifact_key: record.artifact_key().clone(),
            matched_name: matched.matched_name.clone(),
            build_name: record.build_name().map(String::from),
            build_number: record.build_number().map(String::from),
            build_timestamp: record.build_timestamp().map(String::from),
            severities: *record.severities(),
            is_latest_tag: record.artifact_key().is_latest_tag(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryTotals {
    pub totals: SeverityCounts,
    pub artifacts: Vec<AggregatedArtifact>,
    /// Counts of the most recent builds only; present when the repository
    /// declares a publish layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level: Option<SeverityCounts>,
}

/// Folds matched artifacts into per-repository totals.
pub struct VulnerabilityAggregator;

impl VulnerabilityAggregator {
    /// Sums severity counts per repository. Each artifact contributes
    /// independently, so two artifacts of one repository with 1 and 2
    /// criticals give 3.
    pub fn aggregate<I>(matched: I) -> BTreeMap<RepoId, RepositoryTotals>
    where
        I: IntoIterator<Item = MatchedArtifact>,
    {
        let mut totals: BTreeMap<RepoId, RepositoryTotals> = BTreeMap::new();

        for artifact in matched {
            let summary = AggregatedArtifact::from_matched(&artifact);
            let entry = totals.entry(artifact.repo_id).or_default();
            entry.totals += summary.severities;
            entry.artifacts.push(summary);
        }

        totals
    }

    /// Fills `top_level` for repositories with a declared publish layout.
    pub fn apply_top_level(
        totals: &mut BTreeMap<RepoId, RepositoryTotals>,
        index: &RepositoryIndex,
    ) {
        for (repo_id, repo_totals) in totals.iter_mut() {
            let Some(layout) = index.publish_layout(repo_id) else {
                continue;
            };
            let Some(build_names) = index.build_names(repo_id) else {
                continue;
            };
            repo_totals.top_level = Some(TopLevelCounts::compute(
                &repo_totals.artifacts,
                layout,
                build_names,
            ));
        }
    }
}

use super::build_name_extractor::{BuildNameExtractor, ExtractionConfidence};
use crate::vulnerability_matching::domain::{
    AmbiguousMatch, ArtifactRecord, MatchResult, MatchTier, RepoId, RepositoryIndex,
    UnmatchedReason,
};
use std::collections::BTreeSet;

/// Properties searched for build paths when the registry gave no usable name.
pub const DEFAULT_BUILD_NAME_PROPERTIES: &[&str] = &["build.name", "path"];

/// Resolves artifacts to repositories.
///
/// Tiers, each tried only when the previous one found nothing:
/// 1. registry build name, verbatim
/// 2. service name extracted from the build name or from build-path properties
/// 3. fuzzy comparison (case and `-`/`_` insensitive), if enabled
/// 4. unmatched
///
/// Cheap exact tiers come first so results stay reproducible; fuzzy
/// matching can misattribute and is the last resort.
#[derive(Debug, Clone)]
pub struct RepositoryMatcher {
    build_name_properties: Vec<String>,
    fuzzy: bool,
}

impl Default for RepositoryMatcher {
    fn default() -> Self {
        Self::new(
            DEFAULT_BUILD_NAME_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            true,
        )
    }
}

impl RepositoryMatcher {
    pub fn new(build_name_properties: Vec<String>, fuzzy: bool) -> Self {
        Self {
            build_name_properties,
            fuzzy,
        }
    }

    pub fn match_artifact(&self, artifact: &ArtifactRecord, index: &RepositoryIndex) -> MatchResult {
        let build_name = artifact
            .build_name()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        // Tier 1
        if let Some(name) = build_name {
            if let Some(repos) = index.exact(name) {
                return Self::resolve(repos, name, MatchTier::ResolvedBuildName);
            }
        }

        // Tier 2
        let sources = self.extraction_sources(artifact, build_name);
        let extracted = Self::extract_names(artifact, &sources);
        for name in &extracted {
            if let Some(repos) = index.exact(name) {
                return Self::resolve(repos, name, MatchTier::ExtractedName);
            }
        }

        let mut candidates = extracted;
        if let Some(name) = build_name {
            if !candidates.iter().any(|c| c == name) {
                candidates.push(name.to_string());
            }
        }

        // Tier 3
        if self.fuzzy {
            for name in &candidates {
                if let Some(repos) = index.fuzzy(name) {
                    return Self::resolve(repos, name, MatchTier::Fuzzy);
                }
            }
        }

        // Tier 4
        let reason = if sources.is_empty() {
            UnmatchedReason::NoBuildName
        } else if candidates.is_empty() {
            UnmatchedReason::ExtractionFailed {
                inputs: sources.iter().map(|s| s.to_string()).collect(),
            }
        } else {
            UnmatchedReason::NotInIndex { candidates }
        };

        MatchResult::Unmatched { reason }
    }

    /// Raw values to run the extractor on: the registry build name first,
    /// then every configured property in configuration order.
    fn extraction_sources<'a>(
        &'a self,
        artifact: &'a ArtifactRecord,
        build_name: Option<&'a str>,
    ) -> Vec<&'a str> {
        let mut sources: Vec<&str> = build_name.into_iter().collect();
        for key in &self.build_name_properties {
            sources.extend(
                artifact
                    .properties()
                    .get_all(key)
                    .filter(|value| !value.trim().is_empty()),
            );
        }
        sources
    }

    fn extract_names(artifact: &ArtifactRecord, sources: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        for raw in sources {
            match BuildNameExtractor::extract(raw) {
                Ok(extracted) => {
                    if extracted.confidence == ExtractionConfidence::Low {
                        tracing::debug!(
                            artifact_key = %artifact.artifact_key(),
                            path = %raw,
                            service = %extracted.name,
                            "low-confidence build name extraction"
                        );
                    }
                    if !names.contains(&extracted.name) {
                        names.push(extracted.name);
                    }
                }
                Err(failure) => {
                    tracing::trace!(
                        artifact_key = %artifact.artifact_key(),
                        error = %failure,
                        "build name extraction failed"
                    );
                }
            }
        }

        names
    }

    fn resolve(repos: &BTreeSet<RepoId>, name: &str, tier: MatchTier) -> MatchResult {
        let mut ordered = repos.iter().cloned();
        let Some(chosen) = ordered.next() else {
            return MatchResult::Unmatched {
                reason: UnmatchedReason::NotInIndex {
                    candidates: vec![name.to_string()],
                },
            };
        };
        let alternatives: Vec<RepoId> = ordered.collect();

        if alternatives.is_empty() {
            return MatchResult::Matched {
                repo_id: chosen,
                tier,
                matched_name: name.to_string(),
            };
        }

        tracing::warn!(
            build_name = %name,
            chosen = %chosen,
            alternatives = ?alternatives,
            ?tier,
            "ambiguous repository match, keeping the first candidate"
        );

        MatchResult::Ambiguous(AmbiguousMatch {
            chosen,
            alternatives,
            matched_name: name.to_string(),
            tier,
        })
    }
}

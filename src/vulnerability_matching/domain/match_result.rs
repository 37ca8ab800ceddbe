use super::repository::RepoId;
use serde::Serialize;

/// Which matcher tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Registry build name found verbatim in the index
    ResolvedBuildName,
    /// Name extracted from a property path found in the index
    ExtractedName,
    /// Case and separator insensitive comparison
    Fuzzy,
}

/// Several repositories qualified for one artifact; `chosen` won because
/// it sorts first. Kept for audit, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousMatch {
    pub chosen: RepoId,
    pub alternatives: Vec<RepoId>,
    pub matched_name: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// No registry build name and none of the configured properties present
    NoBuildName,
    /// Property values were present but none yielded a service name
    ExtractionFailed { inputs: Vec<String> },
    /// Names were derived but no repository claims them
    NotInIndex { candidates: Vec<String> },
    /// The registry query for this artifact failed during the run
    MetadataFetchFailed { details: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Matched {
        repo_id: RepoId,
        tier: MatchTier,
        matched_name: String,
    },
    Ambiguous(AmbiguousMatch),
    Unmatched {
        #[serde(flatten)]
        reason: UnmatchedReason,
    },
}

impl MatchResult {
    /// Repository the artifact is attributed to (the chosen one when ambiguous).
    pub fn repo_id(&self) -> Option<&RepoId> {
        match self {
            MatchResult::Matched { repo_id, .. } => Some(repo_id),
            MatchResult::Ambiguous(ambiguous) => Some(&ambiguous.chosen),
            MatchResult::Unmatched { .. } => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MatchResult::Ambiguous(_))
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, MatchResult::Unmatched { .. })
    }
}

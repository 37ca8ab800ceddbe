use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Build provenance reported by the artifact registry for one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    #[serde(default)]
    pub build_name: Option<String>,
    #[serde(default)]
    pub build_number: Option<String>,
    #[serde(default)]
    pub build_timestamp: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl BuildMetadata {
    pub fn new(
        build_name: Option<String>,
        build_number: Option<String>,
        build_timestamp: Option<String>,
    ) -> Self {
        Self {
            build_name,
            build_number,
            build_timestamp,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: Option<String>) -> Self {
        self.checksum = checksum;
        self
    }

    /// Whether `self` describes a strictly newer build than `other`.
    ///
    /// A build with a timestamp is newer than one without.
    pub fn is_newer_than(&self, other: &BuildMetadata) -> bool {
        match (&self.build_timestamp, &other.build_timestamp) {
            (Some(a), Some(b)) => compare_build_timestamps(a, b) == Ordering::Greater,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

/// Orders two registry build timestamps.
///
/// Registry timestamps are epoch milliseconds as strings; when both sides
/// parse as integers they compare numerically, otherwise lexically.
pub fn compare_build_timestamps(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// One slot of the metadata cache.
///
/// A `Tombstone` records that the registry confirmed the artifact is absent,
/// which is different from "never looked up" (no entry at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheEntry {
    Resolved {
        metadata: BuildMetadata,
        fetched_at: DateTime<Utc>,
    },
    Tombstone {
        fetched_at: DateTime<Utc>,
    },
}

impl CacheEntry {
    pub fn resolved(metadata: BuildMetadata) -> Self {
        CacheEntry::Resolved {
            metadata,
            fetched_at: Utc::now(),
        }
    }

    pub fn tombstone() -> Self {
        CacheEntry::Tombstone {
            fetched_at: Utc::now(),
        }
    }

    pub fn metadata(&self) -> Option<&BuildMetadata> {
        match self {
            CacheEntry::Resolved { metadata, .. } => Some(metadata),
            CacheEntry::Tombstone { .. } => None,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, CacheEntry::Tombstone { .. })
    }
}

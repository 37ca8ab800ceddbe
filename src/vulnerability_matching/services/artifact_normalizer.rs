use crate::vulnerability_matching::domain::{
    ArtifactKey, ArtifactRecord, Properties, RawArtifactEntry, RawProperty, RawSeverityCounts,
    SeverityCounts,
};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("malformed entry: {details}")]
    Malformed { details: String },
    #[error("invalid artifact key: {details}")]
    InvalidKey { details: String },
    #[error("negative {severity} count ({value})")]
    NegativeCount { severity: &'static str, value: i64 },
    #[error("duplicate artifact key")]
    DuplicateKey,
}

/// A feed entry that could not become an `ArtifactRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    pub artifact_key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedFeed {
    pub records: Vec<ArtifactRecord>,
    pub rejected: Vec<RejectedEntry>,
}

/// Turns raw feed entries into `ArtifactRecord`s.
pub struct ArtifactNormalizer;

impl ArtifactNormalizer {
    pub fn normalize(raw: RawArtifactEntry) -> Result<ArtifactRecord, NormalizationError> {
        let key = ArtifactKey::new(raw.artifact_key).map_err(|e| NormalizationError::InvalidKey {
            details: e.to_string(),
        })?;

        // nested `vulnerabilities` wins over top-level counts
        let counts = raw.vulnerabilities.unwrap_or(raw.counts);
        let severities = Self::validate_counts(&counts)?;

        let properties: Properties = raw
            .properties
            .into_iter()
            .flat_map(RawProperty::into_pairs)
            .collect();

        let artifact_type = raw
            .artifact_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ArtifactRecord::new(key, properties, severities)
            .with_artifact_type(artifact_type)
            .with_checksum(raw.checksum.filter(|c| !c.trim().is_empty()))
            .with_updated_at(raw.updated_at))
    }

    /// Normalizes a whole feed. Bad entries, including ones that do not
    /// deserialize, are rejected individually; the first occurrence of a key
    /// wins.
    pub fn normalize_all(entries: Vec<serde_json::Value>) -> NormalizedFeed {
        let mut feed = NormalizedFeed::default();
        let mut seen: HashSet<ArtifactKey> = HashSet::new();

        for value in entries {
            let raw_key = Self::raw_key(&value);
            let outcome = serde_json::from_value::<RawArtifactEntry>(value)
                .map_err(|e| NormalizationError::Malformed {
                    details: e.to_string(),
                })
                .and_then(Self::normalize)
                .and_then(|record| {
                    if seen.insert(record.artifact_key().clone()) {
                        Ok(record)
                    } else {
                        Err(NormalizationError::DuplicateKey)
                    }
                });

            match outcome {
                Ok(record) => feed.records.push(record),
                Err(e) => {
                    tracing::warn!(artifact_key = %raw_key, error = %e, "rejecting feed entry");
                    feed.rejected.push(RejectedEntry {
                        artifact_key: raw_key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        feed
    }

    /// Best-effort key for reporting an entry that may not deserialize.
    fn raw_key(value: &serde_json::Value) -> String {
        ["key", "artifact_key"]
            .into_iter()
            .find_map(|field| value.get(field).and_then(serde_json::Value::as_str))
            .unwrap_or_default()
            .to_string()
    }

    fn validate_counts(raw: &RawSeverityCounts) -> Result<SeverityCounts, NormalizationError> {
        fn count(severity: &'static str, value: Option<i64>) -> Result<u64, NormalizationError> {
            let value = value.unwrap_or(0);
            u64::try_from(value).map_err(|_| NormalizationError::NegativeCount { severity, value })
        }

        Ok(SeverityCounts {
            critical: count("critical", raw.critical)?,
            high: count("high", raw.high)?,
            medium: count("medium", raw.medium)?,
            low: count("low", raw.low)?,
            unknown: count("unknown", raw.unknown)?,
        })
    }
}

use serde::Deserialize;
use std::collections::BTreeMap;

/// One entry of the raw vulnerability feed, as delivered by the scanner.
///
/// The feed is loosely typed: counts may sit at the top level or under
/// `vulnerabilities`, and properties come either as `{"key", "value"}`
/// pairs or as small `{"name": "value"}` objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtifactEntry {
    #[serde(alias = "key")]
    pub artifact_key: String,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub vulnerabilities: Option<RawSeverityCounts>,
    #[serde(flatten)]
    pub counts: RawSeverityCounts,
    #[serde(default, alias = "type")]
    pub artifact_type: Option<String>,
    #[serde(default, alias = "sha256")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Severity counts before validation; negative values are rejected later.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawSeverityCounts {
    #[serde(default)]
    pub critical: Option<i64>,
    #[serde(default)]
    pub high: Option<i64>,
    #[serde(default)]
    pub medium: Option<i64>,
    #[serde(default)]
    pub low: Option<i64>,
    #[serde(default)]
    pub unknown: Option<i64>,
}

impl RawSeverityCounts {
    pub fn is_empty(&self) -> bool {
        self.critical.is_none()
            && self.high.is_none()
            && self.medium.is_none()
            && self.low.is_none()
            && self.unknown.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawProperty {
    KeyValue { key: String, value: String },
    Map(BTreeMap<String, String>),
}

impl RawProperty {
    /// Flattens into `(key, value)` pairs.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            RawProperty::KeyValue { key, value } => vec![(key, value)],
            RawProperty::Map(map) => map.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_counts_and_map_properties() {
        let entry: RawArtifactEntry = serde_json::from_str(
            r#"{"key":"k1","properties":[{"path":"Diagnostics/web-engine-testing-service/staging"}],"critical":1}"#,
        )
        .unwrap();

        assert_eq!(entry.artifact_key, "k1");
        assert_eq!(entry.counts.critical, Some(1));
        assert!(entry.vulnerabilities.is_none());
        let pairs: Vec<_> = entry
            .properties
            .into_iter()
            .flat_map(RawProperty::into_pairs)
            .collect();
        assert_eq!(
            pairs,
            vec![(
                "path".to_string(),
                "Diagnostics/web-engine-testing-service/staging".to_string()
            )]
        );
    }

    #[test]
    fn test_parse_nested_counts_and_key_value_properties() {
        let entry: RawArtifactEntry = serde_json::from_str(
            r#"{
                "artifact_key": "docker-local/staging/svc/abc/manifest.json",
                "properties": [{"key": "build.name", "value": "svc"}],
                "vulnerabilities": {"high": 2, "low": 1},
                "artifact_type": "docker",
                "sha256": "deadbeef"
            }"#,
        )
        .unwrap();

        let nested = entry.vulnerabilities.unwrap();
        assert_eq!(nested.high, Some(2));
        assert_eq!(nested.low, Some(1));
        assert!(entry.counts.is_empty());
        assert_eq!(entry.artifact_type.as_deref(), Some("docker"));
        assert_eq!(entry.checksum.as_deref(), Some("deadbeef"));
        assert!(matches!(entry.properties[0], RawProperty::KeyValue { .. }));
    }
}

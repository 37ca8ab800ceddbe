use super::name_normalization::comparison_key;
use crate::vulnerability_matching::domain::{compare_build_timestamps, PublishLayout, SeverityCounts};
use crate::vulnerability_matching::services::AggregatedArtifact;
use std::collections::{BTreeMap, BTreeSet};

/// Headline counts for a repository, taken from its most recent builds
/// rather than from every artifact ever deployed.
///
/// - `Mono`: the latest artifact of the repository's first build name
/// - `Multi`: the latest artifact of every build name, summed
///
/// Artifacts without a build timestamp never count as "latest".
pub struct TopLevelCounts;

impl TopLevelCounts {
    pub fn compute(
        artifacts: &[AggregatedArtifact],
        layout: PublishLayout,
        build_names: &BTreeSet<String>,
    ) -> SeverityCounts {
        let latest = Self::latest_per_build(artifacts);

        match layout {
            PublishLayout::Mono => build_names
                .iter()
                .next()
                .and_then(|name| latest.get(&comparison_key(name)))
                .map(|artifact| artifact.severities)
                .unwrap_or_default(),
            PublishLayout::Multi => build_names
                .iter()
                .map(|name| comparison_key(name))
                .collect::<BTreeSet<_>>()
                .iter()
                .filter_map(|key| latest.get(key))
                .map(|artifact| artifact.severities)
                .sum(),
        }
    }

    /// Most recent artifact per build name, keyed by comparison key.
    pub fn latest_per_build(
        artifacts: &[AggregatedArtifact],
    ) -> BTreeMap<String, &AggregatedArtifact> {
        let mut latest: BTreeMap<String, &AggregatedArtifact> = BTreeMap::new();

        for artifact in artifacts {
            let Some(timestamp) = artifact.build_timestamp.as_deref() else {
                continue;
            };

            let key = comparison_key(&artifact.matched_name);
            let newer = match latest.get(&key).and_then(|c| c.build_timestamp.as_deref()) {
                Some(current_ts) => compare_build_timestamps(timestamp, current_ts).is_gt(),
                None => true,
            };
            if newer {
                latest.insert(key, artifact);
            }
        }

        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulnerability_matching::domain::ArtifactKey;

    fn artifact(key: &str, name: &str, ts: Option<&str>, critical: u64) -> AggregatedArtifact {
        AggregatedArtifact {
            artifact_key: ArtifactKey::new(key).unwrap(),
            matched_name: name.to_string(),
            build_name: Some(name.to_string()),
            build_number: None,
            build_timestamp: ts.map(String::from),
            severities: SeverityCounts::critical(critical),
            is_latest_tag: false,
        }
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_latest_per_build_uses_numeric_timestamps() {
        let artifacts = vec![
            artifact("r/a/1", "api", Some("900"), 5),
            artifact("r/a/2", "api", Some("1000"), 1),
            artifact("r/a/3", "api", None, 50),
        ];
        let latest = TopLevelCounts::latest_per_build(&artifacts);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest["api"].artifact_key.as_str(), "r/a/2");
    }

    #[test]
    fn test_mono_takes_first_build_name_latest() {
        let artifacts = vec![
            artifact("r/a/1", "api", Some("1"), 5),
            artifact("r/a/2", "api", Some("2"), 1),
            artifact("r/w/1", "worker", Some("3"), 7),
        ];
        let counts =
            TopLevelCounts::compute(&artifacts, PublishLayout::Mono, &names(&["api", "worker"]));
        assert_eq!(counts.critical, 1);
    }

    #[test]
    fn test_multi_sums_latest_of_each_build() {
        let artifacts = vec![
            artifact("r/a/1", "api", Some("1"), 5),
            artifact("r/a/2", "api", Some("2"), 1),
            artifact("r/w/1", "Worker", Some("3"), 7),
        ];
        let counts =
            TopLevelCounts::compute(&artifacts, PublishLayout::Multi, &names(&["api", "worker"]));
        assert_eq!(counts.critical, 8);
    }

    #[test]
    fn test_no_timestamps_yields_zero() {
        let artifacts = vec![artifact("r/a/1", "api", None, 5)];
        let counts = TopLevelCounts::compute(&artifacts, PublishLayout::Mono, &names(&["api"]));
        assert_eq!(counts, SeverityCounts::default());
    }
}

use crate::vulnerability_matching::policies::comparison_key;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of a source repository (e.g. `org/web-engine`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a repository publishes its build artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishLayout {
    /// One service, one build name
    Mono,
    /// Several services built from the same repository
    Multi,
}

/// One entry of the repository list loaded from the SCM side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRecord {
    pub id: RepoId,
    pub canonical_name: String,
    /// Additional build names known to be produced by this repository
    #[serde(default)]
    pub build_names: Vec<String>,
    #[serde(default)]
    pub publish_layout: Option<PublishLayout>,
}

impl RepositoryRecord {
    pub fn new(id: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            id: RepoId::new(id),
            canonical_name: canonical_name.into(),
            build_names: Vec::new(),
            publish_layout: None,
        }
    }

    pub fn with_build_names(mut self, build_names: Vec<String>) -> Self {
        self.build_names = build_names;
        self
    }

    pub fn with_publish_layout(mut self, layout: PublishLayout) -> Self {
        self.publish_layout = Some(layout);
        self
    }

    /// Canonical name followed by extra build names, blanks dropped.
    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str())
            .chain(self.build_names.iter().map(String::as_str))
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Lookup from build/service name to repository.
///
/// Built once per run and read-only afterwards. Repository sets are sorted,
/// so "first candidate" is always the lexicographically smallest id.
#[derive(Debug, Clone, Default)]
pub struct RepositoryIndex {
    exact: BTreeMap<String, BTreeSet<RepoId>>,
    fuzzy: BTreeMap<String, BTreeSet<RepoId>>,
    build_names: BTreeMap<RepoId, BTreeSet<String>>,
    layouts: BTreeMap<RepoId, PublishLayout>,
}

impl RepositoryIndex {
    pub fn build(records: &[RepositoryRecord]) -> Self {
        let mut index = RepositoryIndex::default();

        for record in records {
            for name in record.names() {
                index
                    .exact
                    .entry(name.to_string())
                    .or_default()
                    .insert(record.id.clone());

                let key = comparison_key(name);
                if !key.is_empty() {
                    index.fuzzy.entry(key).or_default().insert(record.id.clone());
                }

                index
                    .build_names
                    .entry(record.id.clone())
                    .or_default()
                    .insert(name.to_string());
            }

            if let Some(layout) = record.publish_layout {
                index.layouts.insert(record.id.clone(), layout);
            }
        }

        for (name, repos) in &index.exact {
            if repos.len() > 1 {
                tracing::warn!(
                    build_name = %name,
                    repositories = ?repos,
                    "build name is claimed by more than one repository"
                );
            }
        }

        index
    }

    /// Repositories registered under exactly `name`.
    pub fn exact(&self, name: &str) -> Option<&BTreeSet<RepoId>> {
        self.exact.get(name)
    }

    /// Repositories whose names share `name`'s comparison key.
    pub fn fuzzy(&self, name: &str) -> Option<&BTreeSet<RepoId>> {
        let key = comparison_key(name);
        if key.is_empty() {
            return None;
        }
        self.fuzzy.get(&key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.exact.contains_key(name)
    }

    /// Build names registered for a repository, sorted.
    pub fn build_names(&self, repo_id: &RepoId) -> Option<&BTreeSet<String>> {
        self.build_names.get(repo_id)
    }

    pub fn publish_layout(&self, repo_id: &RepoId) -> Option<PublishLayout> {
        self.layouts.get(repo_id).copied()
    }

    /// Number of distinct names in the index.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    pub fn repository_count(&self) -> usize {
        self.build_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_indexes_canonical_and_extra_names() {
        let index = RepositoryIndex::build(&[RepositoryRecord::new("org/engine", "web-engine")
            .with_build_names(vec!["web-engine-worker".into(), "  ".into()])]);

        assert!(index.contains("web-engine"));
        assert!(index.contains("web-engine-worker"));
        assert_eq!(index.len(), 2);
        assert_eq!(index.repository_count(), 1);
        assert_eq!(
            index.build_names(&RepoId::new("org/engine")).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_exact_lookup_keeps_every_claimant_sorted() {
        let index = RepositoryIndex::build(&[
            RepositoryRecord::new("repoB", "shared"),
            RepositoryRecord::new("repoA", "shared"),
        ]);

        let repos: Vec<_> = index.exact("shared").unwrap().iter().cloned().collect();
        assert_eq!(repos, vec![RepoId::new("repoA"), RepoId::new("repoB")]);
    }

    #[test]
    fn test_fuzzy_lookup_groups_normalized_names() {
        let index = RepositoryIndex::build(&[
            RepositoryRecord::new("repoA", "Svc"),
            RepositoryRecord::new("repoB", "s_v-c"),
        ]);

        assert!(index.exact("svc").is_none());
        assert_eq!(index.fuzzy("SVC").unwrap().len(), 2);
        assert!(index.fuzzy("--").is_none());
    }

    #[test]
    fn test_publish_layout_is_recorded() {
        let index = RepositoryIndex::build(&[
            RepositoryRecord::new("repoA", "a").with_publish_layout(PublishLayout::Multi),
            RepositoryRecord::new("repoB", "b"),
        ]);

        assert_eq!(
            index.publish_layout(&RepoId::new("repoA")),
            Some(PublishLayout::Multi)
        );
        assert_eq!(index.publish_layout(&RepoId::new("repoB")), None);
    }

    #[test]
    fn test_repository_record_deserializes_optional_fields() {
        let record: RepositoryRecord = serde_json::from_str(
            r#"{"id": "repoX", "canonical_name": "web-engine-testing-service", "publish_layout": "mono"}"#,
        )
        .unwrap();
        assert_eq!(record.id, RepoId::new("repoX"));
        assert!(record.build_names.is_empty());
        assert_eq!(record.publish_layout, Some(PublishLayout::Mono));
    }
}

use super::build_metadata::BuildMetadata;
use super::severity::SeverityCounts;
use crate::shared::Result;
use serde::{Deserialize, Serialize};

/// Maximum length for artifact keys (security limit)
const MAX_ARTIFACT_KEY_LENGTH: usize = 1024;

/// NewType wrapper for a registry artifact key with validation
///
/// Keys look like `docker-local/staging/alert-handler/<sha>/manifest.json`:
/// the first segment is the registry storage repository, the last one the
/// file name, everything in between the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();

        if trimmed.is_empty() {
            anyhow::bail!("Artifact key cannot be empty");
        }

        if trimmed.len() > MAX_ARTIFACT_KEY_LENGTH {
            anyhow::bail!(
                "Artifact key is too long ({} bytes). Maximum allowed: {} bytes",
                trimmed.len(),
                MAX_ARTIFACT_KEY_LENGTH
            );
        }

        if trimmed.chars().any(char::is_control) {
            anyhow::bail!("Artifact key contains control characters");
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry-level storage location (first `/` segment).
    pub fn storage_repository(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// Splits the key into registry repository, path and file name.
    ///
    /// Returns `None` when the key has fewer than two segments; such keys
    /// cannot be looked up in the registry.
    pub fn locate(&self) -> Option<ArtifactLocation> {
        let parts: Vec<&str> = self.0.split('/').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        let repo = parts[0].to_string();
        let name = parts[parts.len() - 1].to_string();
        let path = parts[1..parts.len() - 1].join("/");

        Some(ArtifactLocation { repo, path, name })
    }

    /// True when the storage repository is a local one: the suffix after
    /// its last `-` contains `local` (`docker-local`, `npm-prodlocal`).
    pub fn is_local_repository(&self) -> bool {
        let repo = self.storage_repository();
        match repo.rfind('-') {
            Some(idx) => repo[idx + 1..].contains("local"),
            None => false,
        }
    }

    /// True for container tags pinned to `:latest`.
    pub fn is_latest_tag(&self) -> bool {
        self.0.ends_with(":latest")
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry coordinates of an artifact, as used by AQL item queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactLocation {
    pub repo: String,
    pub path: String,
    pub name: String,
}

impl ArtifactLocation {
    /// Rebuilds the key string these coordinates came from.
    pub fn to_key_string(&self) -> String {
        if self.path.is_empty() {
            format!("{}/{}", self.repo, self.name)
        } else {
            format!("{}/{}/{}", self.repo, self.path, self.name)
        }
    }
}

/// A single key/value property attached to an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered property list; keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Vec<Property>);

impl Properties {
    pub fn new(properties: Vec<Property>) -> Self {
        Self(properties)
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| Property::new(k, v)).collect())
    }
}

/// A deployed artifact with its vulnerability counts.
///
/// Build fields start empty and are filled at most once, from registry
/// metadata, while matching. After that the record does not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    artifact_key: ArtifactKey,
    repo_name: String,
    properties: Properties,
    severities: SeverityCounts,
    artifact_type: String,
    build_name: Option<String>,
    build_number: Option<String>,
    build_timestamp: Option<String>,
    checksum: Option<String>,
    updated_at: Option<String>,
    #[serde(skip)]
    build_resolved: bool,
}

impl ArtifactRecord {
    pub fn new(artifact_key: ArtifactKey, properties: Properties, severities: SeverityCounts) -> Self {
        let repo_name = artifact_key.storage_repository().to_string();
        Self {
            artifact_key,
            repo_name,
            properties,
            severities,
            artifact_type: "unknown".to_string(),
            build_name: None,
            build_number: None,
            build_timestamp: None,
            checksum: None,
            updated_at: None,
            build_resolved: false,
        }
    }

    pub fn with_artifact_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.artifact_type = artifact_type.into();
        self
    }

    pub fn with_checksum(mut self, checksum: Option<String>) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn with_updated_at(mut self, updated_at: Option<String>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Fills the build fields from registry metadata.
    ///
    /// Returns `false` (and changes nothing) if the record was already resolved.
    /// A checksum supplied by the feed is kept.
    pub fn resolve_build(&mut self, metadata: &BuildMetadata) -> bool {
        if self.build_resolved {
            return false;
        }

        self.build_name = metadata.build_name.clone();
        self.build_number = metadata.build_number.clone();
        self.build_timestamp = metadata.build_timestamp.clone();
        if self.checksum.is_none() {
            self.checksum = metadata.checksum.clone();
        }
        self.build_resolved = true;
        true
    }

    pub fn artifact_key(&self) -> &ArtifactKey {
        &self.artifact_key
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn severities(&self) -> &SeverityCounts {
        &self.severities
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    pub fn build_name(&self) -> Option<&str> {
        self.build_name.as_deref()
    }

    pub fn build_number(&self) -> Option<&str> {
        self.build_number.as_deref()
    }

    pub fn build_timestamp(&self) -> Option<&str> {
        self.build_timestamp.as_deref()
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    pub fn is_build_resolved(&self) -> bool {
        self.build_resolved
    }
}

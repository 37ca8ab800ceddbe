use repo_vuln::prelude::*;
use repo_vuln::shared::error::MetadataFetchError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock RegistryMetadataSource backed by a map of artifact key to build
///
/// Clones share the query counter, so a test can keep one handle while the
/// use case owns another.
#[derive(Clone, Default)]
pub struct MockRegistry {
    builds: HashMap<String, BuildMetadata>,
    should_fail: bool,
    queries: Arc<AtomicUsize>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_build(mut self, key: &str, build_name: &str, number: &str, timestamp: &str) -> Self {
        self.builds.insert(
            key.to_string(),
            BuildMetadata::new(
                Some(build_name.to_string()),
                Some(number.to_string()),
                Some(timestamp.to_string()),
            ),
        );
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of batch queries received
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl RegistryMetadataSource for MockRegistry {
    fn query(&self, key: &ArtifactKey) -> std::result::Result<Option<BuildMetadata>, MetadataFetchError> {
        let found = self.query_many(std::slice::from_ref(key))?;
        Ok(found.get(key).cloned())
    }

    fn query_many(
        &self,
        keys: &[ArtifactKey],
    ) -> std::result::Result<HashMap<ArtifactKey, BuildMetadata>, MetadataFetchError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(MetadataFetchError::Status { status: 503 });
        }
        Ok(keys
            .iter()
            .filter_map(|key| {
                self.builds
                    .get(key.as_str())
                    .map(|metadata| (key.clone(), metadata.clone()))
            })
            .collect())
    }
}

use crate::shared::error::MetadataFetchError;
use crate::vulnerability_matching::domain::{ArtifactKey, BuildMetadata};
use std::collections::HashMap;

/// RegistryMetadataSource port for build provenance lookups
///
/// This port abstracts the artifact registry (e.g., an Artifactory AQL
/// endpoint). Callers never use it directly; every query goes through the
/// metadata cache.
pub trait RegistryMetadataSource {
    /// Queries build metadata for a single artifact
    ///
    /// # Returns
    /// `Ok(None)` when the registry has no such artifact
    ///
    /// # Errors
    /// Returns a `MetadataFetchError` on timeouts, transport failures,
    /// unexpected status codes or undecodable responses
    fn query(&self, key: &ArtifactKey) -> Result<Option<BuildMetadata>, MetadataFetchError>;

    /// Queries several artifacts with one disjunctive request
    ///
    /// Keys missing from the returned map were not found. The default
    /// implementation issues one `query` per key.
    fn query_many(
        &self,
        keys: &[ArtifactKey],
    ) -> Result<HashMap<ArtifactKey, BuildMetadata>, MetadataFetchError> {
        let mut found = HashMap::new();
        for key in keys {
            if let Some(metadata) = self.query(key)? {
                found.insert(key.clone(), metadata);
            }
        }
        Ok(found)
    }
}

impl<T: RegistryMetadataSource + ?Sized> RegistryMetadataSource for &T {
    fn query(&self, key: &ArtifactKey) -> Result<Option<BuildMetadata>, MetadataFetchError> {
        (**self).query(key)
    }

    fn query_many(
        &self,
        keys: &[ArtifactKey],
    ) -> Result<HashMap<ArtifactKey, BuildMetadata>, MetadataFetchError> {
        (**self).query_many(keys)
    }
}

impl<T: RegistryMetadataSource + ?Sized> RegistryMetadataSource for Box<T> {
    fn query(&self, key: &ArtifactKey) -> Result<Option<BuildMetadata>, MetadataFetchError> {
        (**self).query(key)
    }

    fn query_many(
        &self,
        keys: &[ArtifactKey],
    ) -> Result<HashMap<ArtifactKey, BuildMetadata>, MetadataFetchError> {
        (**self).query_many(keys)
    }
}

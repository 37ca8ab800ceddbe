use crate::ports::outbound::RegistryMetadataSource;
use crate::shared::error::MetadataFetchError;
use crate::vulnerability_matching::domain::{ArtifactKey, BuildMetadata};
use std::collections::HashMap;

/// OfflineRegistry adapter used when no registry is configured or
/// `--offline` is given. Every artifact is reported as not found, so
/// matching relies on feed properties alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRegistry;

impl RegistryMetadataSource for OfflineRegistry {
    fn query(&self, _key: &ArtifactKey) -> Result<Option<BuildMetadata>, MetadataFetchError> {
        Ok(None)
    }

    fn query_many(
        &self,
        _keys: &[ArtifactKey],
    ) -> Result<HashMap<ArtifactKey, BuildMetadata>, MetadataFetchError> {
        Ok(HashMap::new())
    }
}

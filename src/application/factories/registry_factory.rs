use crate::adapters::outbound::network::{ArtifactoryClient, ArtifactorySettings, OfflineRegistry};
use crate::ports::outbound::RegistryMetadataSource;
use crate::shared::Result;

/// Registry selection for a run
#[derive(Debug, Clone)]
pub enum RegistryType {
    /// No registry: every artifact is "not found"
    Offline,
    Artifactory(ArtifactorySettings),
}

/// Factory for creating registry metadata sources
///
/// Called inside each product's blocking task, since the blocking HTTP
/// client must not be created or dropped on an async worker thread.
pub struct RegistryFactory;

impl RegistryFactory {
    pub fn create(registry_type: RegistryType) -> Result<Box<dyn RegistryMetadataSource>> {
        match registry_type {
            RegistryType::Offline => Ok(Box::new(OfflineRegistry)),
            RegistryType::Artifactory(settings) => {
                tracing::debug!(base_url = %settings.base_url, "using Artifactory registry");
                Ok(Box::new(ArtifactoryClient::new(settings)?))
            }
        }
    }
}

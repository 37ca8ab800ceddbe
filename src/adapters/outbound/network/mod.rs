/// Network adapters for the artifact registry
mod artifactory_client;
mod offline_registry;

pub use artifactory_client::{ArtifactoryClient, ArtifactorySettings};
pub use offline_registry::OfflineRegistry;

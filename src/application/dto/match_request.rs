use crate::application::cache::DEFAULT_BATCH_SIZE;
use crate::vulnerability_matching::services::DEFAULT_BUILD_NAME_PROPERTIES;
use std::path::PathBuf;

/// Matching knobs shared by every product of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    /// Properties searched for build paths, in precedence order
    pub build_name_properties: Vec<String>,
    /// Enables the case/separator insensitive tier
    pub fuzzy: bool,
    /// Only query the registry for artifacts stored in `*-local` repositories
    pub local_repositories_only: bool,
    /// Artifacts per registry query
    pub batch_size: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            build_name_properties: DEFAULT_BUILD_NAME_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            fuzzy: true,
            local_repositories_only: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// MatchRequest - one product's matching run
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub product: String,
    /// JSON array of artifact entries
    pub feed_path: PathBuf,
    /// JSON array of repository records
    pub repositories_path: PathBuf,
    pub options: MatchOptions,
}

impl MatchRequest {
    pub fn new(
        product: impl Into<String>,
        feed_path: PathBuf,
        repositories_path: PathBuf,
        options: MatchOptions,
    ) -> Self {
        Self {
            product: product.into(),
            feed_path,
            repositories_path,
            options,
        }
    }
}

use crate::shared::Result;
use std::path::Path;

/// VulnerabilityFeedReader port for loading the per-product artifact feed
pub trait VulnerabilityFeedReader {
    /// Reads every entry of the feed as untyped JSON
    ///
    /// # Errors
    /// Returns an error if the file is missing, unsafe to read, or not a
    /// JSON array. Individual bad entries are not errors here; the
    /// normalizer rejects them later.
    fn read_feed(&self, path: &Path) -> Result<Vec<serde_json::Value>>;
}

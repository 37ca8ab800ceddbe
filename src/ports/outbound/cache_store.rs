use crate::shared::Result;
use crate::vulnerability_matching::domain::{ArtifactKey, CacheEntry};

/// CacheStore port for persisting the metadata cache between runs
///
/// Each product has its own slot so concurrent product runs never share
/// a file.
pub trait CacheStore {
    /// Loads the entries saved for `product`
    ///
    /// A missing store is an empty cache, not an error.
    fn load(&self, product: &str) -> Result<Vec<(ArtifactKey, CacheEntry)>>;

    /// Replaces the saved entries for `product`
    fn save(&self, product: &str, entries: &[(ArtifactKey, CacheEntry)]) -> Result<()>;
}

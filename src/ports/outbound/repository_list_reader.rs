use crate::shared::Result;
use crate::vulnerability_matching::domain::RepositoryRecord;
use std::path::Path;

/// RepositoryListReader port for loading the known source repositories
pub trait RepositoryListReader {
    /// # Errors
    /// Returns an error if the list cannot be read or parsed
    fn read_repositories(&self, path: &Path) -> Result<Vec<RepositoryRecord>>;
}

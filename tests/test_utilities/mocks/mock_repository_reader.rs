use repo_vuln::prelude::*;
use std::path::Path;

/// Mock RepositoryListReader returning a fixed repository list
#[derive(Clone, Default)]
pub struct MockRepositoryReader {
    records: Vec<RepositoryRecord>,
}

impl MockRepositoryReader {
    pub fn new(records: Vec<RepositoryRecord>) -> Self {
        Self { records }
    }
}

impl RepositoryListReader for MockRepositoryReader {
    fn read_repositories(&self, _path: &Path) -> Result<Vec<RepositoryRecord>> {
        Ok(self.records.clone())
    }
}

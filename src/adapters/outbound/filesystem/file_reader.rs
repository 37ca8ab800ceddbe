use crate::ports::outbound::{RepositoryListReader, VulnerabilityFeedReader};
use crate::shared::error::RepoVulnError;
use crate::shared::security::read_checked_file;
use crate::shared::Result;
use crate::vulnerability_matching::domain::RepositoryRecord;
use std::path::Path;

/// FileSystemReader adapter for the JSON input files
///
/// Implements both VulnerabilityFeedReader and RepositoryListReader. Every
/// read goes through the shared security checks (no symlinks, regular
/// files only, size limit).
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnerabilityFeedReader for FileSystemReader {
    fn read_feed(&self, path: &Path) -> Result<Vec<serde_json::Value>> {
        if !path.exists() {
            return Err(RepoVulnError::FeedNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = read_checked_file(path, "vulnerability feed").map_err(|e| {
            RepoVulnError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;

        serde_json::from_str(&content).map_err(|e| {
            RepoVulnError::FeedParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl RepositoryListReader for FileSystemReader {
    fn read_repositories(&self, path: &Path) -> Result<Vec<RepositoryRecord>> {
        if !path.exists() {
            return Err(RepoVulnError::RepositoryListNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = read_checked_file(path, "repository list").map_err(|e| {
            RepoVulnError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;

        serde_json::from_str(&content).map_err(|e| {
            RepoVulnError::RepositoryListParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_feed_success() {
        let temp_dir = TempDir::new().unwrap();
        let feed_path = temp_dir.path().join("feed.json");
        fs::write(
            &feed_path,
            r#"[{"key":"k1","properties":[{"key":"path","value":"a/b/c"}],"critical":1}]"#,
        )
        .unwrap();

        let entries = FileSystemReader::new().read_feed(&feed_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["key"], "k1");
    }

    #[test]
    fn test_read_feed_keeps_malformed_entries_for_the_normalizer() {
        let temp_dir = TempDir::new().unwrap();
        let feed_path = temp_dir.path().join("feed.json");
        fs::write(
            &feed_path,
            r#"[{"key":"k1","critical":1},{"key":"k2","properties":[{"build.number":42}]},{"critical":1}]"#,
        )
        .unwrap();

        let entries = FileSystemReader::new().read_feed(&feed_path).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_read_feed_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileSystemReader::new().read_feed(&temp_dir.path().join("missing.json"));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Vulnerability feed not found"));
    }

    #[test]
    fn test_read_feed_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let feed_path = temp_dir.path().join("feed.json");
        fs::write(&feed_path, r#"{"not": "an array"}"#).unwrap();

        let err = FileSystemReader::new().read_feed(&feed_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse vulnerability feed"));
    }

    #[test]
    fn test_read_feed_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileSystemReader::new().read_feed(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_read_repositories_success() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("repos.json");
        fs::write(
            &path,
            r#"[{"id":"repoX","canonical_name":"web-engine-testing-service","build_names":["wets"]}]"#,
        )
        .unwrap();

        let records = FileSystemReader::new().read_repositories(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].build_names, vec!["wets"]);
    }

    #[test]
    fn test_read_repositories_missing_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("repos.json");
        fs::write(&path, r#"[{"id":"repoX"}]"#).unwrap();

        let err = FileSystemReader::new().read_repositories(&path).unwrap_err();
        assert!(err.to_string().contains("canonical_name"));
    }
}

use crate::ports::outbound::CacheStore;
use crate::shared::error::RepoVulnError;
use crate::shared::security::{read_checked_file, validate_not_symlink};
use crate::shared::Result;
use crate::vulnerability_matching::domain::{ArtifactKey, CacheEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    product: String,
    saved_at: DateTime<Utc>,
    entries: BTreeMap<String, CacheEntry>,
}

/// JsonCacheStore adapter persisting one JSON file per product
///
/// Writes go to a temporary file in the same directory and are renamed
/// into place, so a crash never leaves a half-written cache behind.
pub struct JsonCacheStore {
    directory: PathBuf,
}

impl JsonCacheStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// File name stem for `product`; characters outside `[A-Za-z0-9._-]`
    /// become `_`. Distinct products can share a stem, so callers that run
    /// several products must check for collisions.
    pub fn file_stem(product: &str) -> String {
        let sanitized: String = product
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        match sanitized.trim_start_matches('.') {
            "" => "default".to_string(),
            stem => stem.to_string(),
        }
    }

    pub fn cache_path(&self, product: &str) -> PathBuf {
        self.directory
            .join(format!("{}.json", Self::file_stem(product)))
    }

    fn parse(path: &Path, product: &str, content: &str) -> Vec<(ArtifactKey, CacheEntry)> {
        let file: CacheFile = match serde_json::from_str(content) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "metadata cache is corrupt, starting empty");
                return Vec::new();
            }
        };

        if file.version != CACHE_FORMAT_VERSION {
            tracing::warn!(
                path = %path.display(),
                version = file.version,
                "unsupported metadata cache version, starting empty"
            );
            return Vec::new();
        }

        if file.product != product {
            tracing::warn!(
                path = %path.display(),
                expected = product,
                found = %file.product,
                "metadata cache belongs to another product, starting empty"
            );
            return Vec::new();
        }

        file.entries
            .into_iter()
            .filter_map(|(raw_key, entry)| match ArtifactKey::new(raw_key.as_str()) {
                Ok(key) => Some((key, entry)),
                Err(e) => {
                    tracing::warn!(artifact_key = %raw_key, error = %e, "dropping cached entry");
                    None
                }
            })
            .collect()
    }
}

impl CacheStore for JsonCacheStore {
    fn load(&self, product: &str) -> Result<Vec<(ArtifactKey, CacheEntry)>> {
        let path = self.cache_path(product);
        if fs::symlink_metadata(&path).is_err() {
            return Ok(Vec::new());
        }

        let content = read_checked_file(&path, "metadata cache")?;
        Ok(Self::parse(&path, product, &content))
    }

    fn save(&self, product: &str, entries: &[(ArtifactKey, CacheEntry)]) -> Result<()> {
        let path = self.cache_path(product);
        let write_error = |details: String| RepoVulnError::FileWriteError {
            path: path.clone(),
            details,
        };

        fs::create_dir_all(&self.directory).map_err(|e| write_error(e.to_string()))?;
        validate_not_symlink(&self.directory, "cache write")?;
        if fs::symlink_metadata(&path).is_ok() {
            validate_not_symlink(&path, "cache write").map_err(|e| RepoVulnError::SecurityError {
                path: path.clone(),
                reason: e.to_string(),
                hint: "Remove the link or point --cache-dir at another directory".to_string(),
            })?;
        }

        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            product: product.to_string(),
            saved_at: Utc::now(),
            entries: entries
                .iter()
                .filter(|(_, entry)| !entry.is_tombstone())
                .map(|(key, entry)| (key.as_str().to_string(), entry.clone()))
                .collect(),
        };
        let json = serde_json::to_vec_pretty(&file)?;

        let mut temp = NamedTempFile::new_in(&self.directory).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(&json).map_err(|e| write_error(e.to_string()))?;
        temp.persist(&path).map_err(|e| write_error(e.error.to_string()))?;

        tracing::debug!(product, entries = file.entries.len(), path = %path.display(), "metadata cache saved");
        Ok(())
    }
}

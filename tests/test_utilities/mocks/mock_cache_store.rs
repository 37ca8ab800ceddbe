use repo_vuln::prelude::*;
use repo_vuln::vulnerability_matching::domain::CacheEntry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Entries = Vec<(ArtifactKey, CacheEntry)>;

/// In-memory CacheStore keyed by product
///
/// Clones share storage, which lets a test run the same product twice and
/// observe the warm start.
#[derive(Clone, Default)]
pub struct MockCacheStore {
    files: Arc<Mutex<HashMap<String, Entries>>>,
    saves: Arc<Mutex<usize>>,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self, product: &str) -> Option<Entries> {
        self.files.lock().unwrap().get(product).cloned()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl CacheStore for MockCacheStore {
    fn load(&self, product: &str) -> Result<Entries> {
        Ok(self.saved(product).unwrap_or_default())
    }

    fn save(&self, product: &str, entries: &[(ArtifactKey, CacheEntry)]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(product.to_string(), entries.to_vec());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

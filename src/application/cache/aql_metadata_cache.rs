use crate::ports::outbound::RegistryMetadataSource;
use crate::shared::error::MetadataFetchError;
use crate::vulnerability_matching::domain::{ArtifactKey, BuildMetadata, CacheEntry};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of artifacts per disjunctive registry query
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Result of a batched fetch.
///
/// Every requested key ends up in exactly one of the two maps.
#[derive(Debug, Clone, Default)]
pub struct BatchFetchOutcome {
    pub entries: BTreeMap<ArtifactKey, CacheEntry>,
    pub failed: BTreeMap<ArtifactKey, MetadataFetchError>,
}

/// Counters for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Keys that had to go to the registry
    pub misses: usize,
    /// Requests sent to the registry
    pub registry_queries: usize,
    /// Not-found results recorded this run
    pub tombstones: usize,
    /// Entries currently held
    pub entries: usize,
}

/// AqlMetadataCache is the only path from the pipeline to the registry.
///
/// Keys already cached, positive or tombstone, are never queried again
/// during a run. Entries are replaced whole through the map's per-key
/// entry lock. `fetch_and_store` keeps that lock for the whole registry
/// round trip; batched fetches do not, and when two batches race on a key
/// the first stored answer wins.
///
/// Tombstones live as long as the cache object; `snapshot` leaves them out,
/// so a missing artifact is retried on the next run.
pub struct AqlMetadataCache<R: RegistryMetadataSource> {
    registry: R,
    entries: DashMap<ArtifactKey, CacheEntry>,
    batch_size: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    registry_queries: AtomicUsize,
    tombstones: AtomicUsize,
}

impl<R: RegistryMetadataSource> AqlMetadataCache<R> {
    pub fn new(registry: R) -> Self {
        Self::with_batch_size(registry, DEFAULT_BATCH_SIZE)
    }

    /// A `batch_size` of 0 is treated as 1.
    pub fn with_batch_size(registry: R, batch_size: usize) -> Self {
        Self {
            registry,
            entries: DashMap::new(),
            batch_size: batch_size.max(1),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            registry_queries: AtomicUsize::new(0),
            tombstones: AtomicUsize::new(0),
        }
    }

    /// Cached entry for `key`, without touching the registry.
    pub fn lookup(&self, key: &ArtifactKey) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Returns the cached entry or queries the registry once and caches the
    /// answer. A registry failure caches nothing.
    ///
    /// The key's entry lock is held across the registry query, so concurrent
    /// callers for one key wait for the first answer instead of querying again.
    pub fn fetch_and_store(&self, key: &ArtifactKey) -> Result<CacheEntry, MetadataFetchError> {
        let slot = match self.entries.entry(key.clone()) {
            Entry::Occupied(existing) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(existing.get().clone());
            }
            Entry::Vacant(slot) => slot,
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        self.registry_queries.fetch_add(1, Ordering::Relaxed);

        let entry = match self.registry.query(key)? {
            Some(metadata) => CacheEntry::resolved(metadata),
            None => {
                self.tombstones.fetch_add(1, Ordering::Relaxed);
                CacheEntry::tombstone()
            }
        };
        Ok(slot.insert(entry).value().clone())
    }

    pub fn fetch_batch(&self, keys: &[ArtifactKey]) -> BatchFetchOutcome {
        self.fetch_batch_with_progress(keys, |_, _| {})
    }

    /// Like `fetch_batch`, calling `on_chunk(done, total)` after each
    /// registry request.
    pub fn fetch_batch_with_progress<F>(&self, keys: &[ArtifactKey], mut on_chunk: F) -> BatchFetchOutcome
    where
        F: FnMut(usize, usize),
    {
        let mut outcome = BatchFetchOutcome::default();
        let mut seen: HashSet<&ArtifactKey> = HashSet::new();
        let mut pending: Vec<ArtifactKey> = Vec::new();

        for key in keys {
            if !seen.insert(key) {
                continue;
            }
            match self.lookup(key) {
                Some(entry) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    outcome.entries.insert(key.clone(), entry);
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    pending.push(key.clone());
                }
            }
        }

        let total = pending.len();
        let mut done = 0;

        for chunk in pending.chunks(self.batch_size) {
            self.registry_queries.fetch_add(1, Ordering::Relaxed);

            match self.registry.query_many(chunk) {
                Ok(mut found) => {
                    for key in chunk {
                        let entry = match found.remove(key) {
                            Some(metadata) => CacheEntry::resolved(metadata),
                            None => CacheEntry::tombstone(),
                        };
                        let stored = self.insert_fetched(key, entry);
                        outcome.entries.insert(key.clone(), stored);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        artifacts = chunk.len(),
                        error = %e,
                        "registry query failed, artifacts stay unresolved for this run"
                    );
                    for key in chunk {
                        outcome.failed.insert(key.clone(), e.clone());
                    }
                }
            }

            done += chunk.len();
            on_chunk(done, total);
        }

        outcome
    }

    /// Stores a positive entry unless an equal or newer build is already
    /// cached. Returns whether the cache changed.
    pub fn store(&self, key: ArtifactKey, metadata: BuildMetadata) -> bool {
        self.store_entry(key, CacheEntry::resolved(metadata))
    }

    /// Loads persisted entries. Tombstones are skipped.
    pub fn seed<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (ArtifactKey, CacheEntry)>,
    {
        entries
            .into_iter()
            .filter(|(_, entry)| !entry.is_tombstone())
            .filter(|(key, entry)| self.store_entry(key.clone(), entry.clone()))
            .count()
    }

    /// Positive entries, sorted by key, for persisting.
    pub fn snapshot(&self) -> Vec<(ArtifactKey, CacheEntry)> {
        let mut positive: Vec<(ArtifactKey, CacheEntry)> = self
            .entries
            .iter()
            .filter(|entry| !entry.value().is_tombstone())
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        positive.sort_by(|a, b| a.0.cmp(&b.0));
        positive
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            registry_queries: self.registry_queries.load(Ordering::Relaxed),
            tombstones: self.tombstones.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First writer wins for freshly fetched entries.
    fn insert_fetched(&self, key: &ArtifactKey, entry: CacheEntry) -> CacheEntry {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                if entry.is_tombstone() {
                    self.tombstones.fetch_add(1, Ordering::Relaxed);
                }
                slot.insert(entry).value().clone()
            }
        }
    }

    fn store_entry(&self, key: ArtifactKey, entry: CacheEntry) -> bool {
        let Some(incoming) = entry.metadata() else {
            return false;
        };

        match self.entries.entry(key) {
            Entry::Occupied(mut existing) => {
                let replace = match existing.get().metadata() {
                    Some(current) => incoming.is_newer_than(current),
                    None => true,
                };
                if replace {
                    existing.insert(entry);
                }
                replace
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }
}

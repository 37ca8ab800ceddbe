/// Run-scoped registry metadata cache
mod aql_metadata_cache;

pub use aql_metadata_cache::{AqlMetadataCache, BatchFetchOutcome, CacheStats, DEFAULT_BATCH_SIZE};

/// Mock implementations for testing
mod mock_cache_store;
mod mock_feed_reader;
mod mock_progress_reporter;
mod mock_registry;
mod mock_repository_reader;

pub use mock_cache_store::MockCacheStore;
pub use mock_feed_reader::MockFeedReader;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_registry::MockRegistry;
pub use mock_repository_reader::MockRepositoryReader;

/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, registry, console).
pub mod cache_store;
pub mod output_presenter;
pub mod progress_reporter;
pub mod registry_metadata_source;
pub mod report_formatter;
pub mod repository_list_reader;
pub mod vulnerability_feed_reader;

pub use cache_store::CacheStore;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use registry_metadata_source::RegistryMetadataSource;
pub use report_formatter::ReportFormatter;
pub use repository_list_reader::RepositoryListReader;
pub use vulnerability_feed_reader::VulnerabilityFeedReader;

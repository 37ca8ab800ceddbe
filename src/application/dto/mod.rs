/// Data Transfer Objects for application layer
///
/// DTOs carry requests into the use cases and reports out to the
/// formatters, keeping the domain layer isolated.
mod match_request;
mod product_report;
mod run_report;

pub use match_request::{MatchOptions, MatchRequest};
pub use product_report::{AmbiguousArtifact, ProductReport, RunStatistics, UnmatchedArtifact};
pub use run_report::{RunReport, ToolInfo};

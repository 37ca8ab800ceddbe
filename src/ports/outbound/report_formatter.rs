use crate::application::dto::RunReport;
use crate::shared::Result;

/// ReportFormatter port for rendering a run report
pub trait ReportFormatter {
    /// Renders the report to a string ready for presentation
    fn format(&self, report: &RunReport) -> Result<String>;
}

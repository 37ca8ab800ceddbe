use crate::shared::Result;

/// OutputPresenter port for presenting the rendered report
///
/// Abstracts the destination (stdout, a file) of the JSON run report.
pub trait OutputPresenter {
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}

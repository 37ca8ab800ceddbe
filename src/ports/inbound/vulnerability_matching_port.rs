use crate::application::dto::{MatchRequest, ProductReport};
use crate::shared::Result;

/// VulnerabilityMatchingPort - Inbound port for the matching use case
///
/// This is what the CLI drives: one call per product.
pub trait VulnerabilityMatchingPort {
    /// Attributes one product's vulnerable artifacts to source repositories
    ///
    /// # Errors
    /// Returns an error only when the inputs cannot be loaded. Registry
    /// failures, rejected entries and unmatched artifacts are reported in
    /// the `ProductReport` instead.
    fn match_product(&self, request: MatchRequest) -> Result<ProductReport>;
}

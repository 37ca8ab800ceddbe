use super::ProductReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// RunReport - the document handed to the downstream report generator
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub tool: ToolInfo,
    pub products: Vec<ProductReport>,
}

impl RunReport {
    pub fn new(products: Vec<ProductReport>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            tool: ToolInfo::default(),
            products,
        }
    }

    pub fn has_unmatched(&self) -> bool {
        self.products.iter().any(ProductReport::has_unmatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::RunStatistics;
    use std::collections::BTreeMap;

    fn empty_product(name: &str) -> ProductReport {
        ProductReport {
            product: name.to_string(),
            totals: BTreeMap::new(),
            unmatched: Vec::new(),
            ambiguous: Vec::new(),
            rejected: Vec::new(),
            stats: RunStatistics::default(),
        }
    }

    #[test]
    fn test_run_report_metadata() {
        let report = RunReport::new(vec![empty_product("diagnostics")]);
        assert_eq!(report.tool.name, "repo-vuln");
        assert!(!report.tool.version.is_empty());
        assert!(!report.has_unmatched());
        assert_ne!(report.run_id, RunReport::new(Vec::new()).run_id);
    }
}

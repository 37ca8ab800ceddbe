use repo_vuln::prelude::*;
use std::path::Path;

/// Mock VulnerabilityFeedReader serving a JSON feed from memory
#[derive(Clone)]
pub struct MockFeedReader {
    json: String,
    should_fail: bool,
}

impl MockFeedReader {
    pub fn new(json: &str) -> Self {
        Self {
            json: json.to_string(),
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            json: String::new(),
            should_fail: true,
        }
    }
}

impl VulnerabilityFeedReader for MockFeedReader {
    fn read_feed(&self, path: &Path) -> Result<Vec<serde_json::Value>> {
        if self.should_fail {
            anyhow::bail!("Mock feed reader failure: {}", path.display());
        }
        Ok(serde_json::from_str(&self.json)?)
    }
}

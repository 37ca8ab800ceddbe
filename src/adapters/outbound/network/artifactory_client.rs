use crate::ports::outbound::RegistryMetadataSource;
use crate::shared::error::MetadataFetchError;
use crate::shared::Result;
use crate::vulnerability_matching::domain::{ArtifactKey, ArtifactLocation, BuildMetadata, Property};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Connection settings for an Artifactory instance
#[derive(Clone)]
pub struct ArtifactorySettings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl std::fmt::Debug for ArtifactorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactorySettings")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AqlResponse {
    #[serde(default)]
    results: Vec<AqlItem>,
}

#[derive(Debug, Deserialize)]
struct AqlItem {
    repo: String,
    path: String,
    name: String,
    #[serde(default)]
    properties: Vec<Property>,
}

/// Artifactory AQL client for build provenance
///
/// One `items.find` request per batch with an `$or` over the artifacts'
/// repository, path and name. Build fields come from the `build.name`,
/// `build.number`, `build.timestamp` and `sha256` item properties.
///
/// # Security
/// - Query values are JSON-encoded, never spliced in raw
/// - Implements timeout (configurable, default 60 seconds)
/// - Retries timeouts, transport errors and 5xx responses with backoff
pub struct ArtifactoryClient {
    client: Client,
    aql_url: String,
    token: Option<String>,
    max_retries: u32,
}

impl ArtifactoryClient {
    const AQL_PATH: &'static str = "/artifactory/api/search/aql";
    const RETRY_BACKOFF_MS: u64 = 200;

    pub fn new(settings: ArtifactorySettings) -> Result<Self> {
        let base_url = settings.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            anyhow::bail!(
                "Registry URL must start with http:// or https://, got '{}'",
                settings.base_url
            );
        }

        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("repo-vuln/{}", version);
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            aql_url: format!("{}{}", base_url, Self::AQL_PATH),
            token: settings.token.filter(|t| !t.trim().is_empty()),
            max_retries: settings.max_retries.max(1),
        })
    }

    /// Posts one AQL query, retrying recoverable failures
    fn post_with_retry(&self, query: &str) -> std::result::Result<AqlResponse, MetadataFetchError> {
        let mut attempt = 1;
        loop {
            match self.post(query) {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && Self::is_retryable(&e) => {
                    tracing::debug!(attempt, error = %e, "retrying registry query");
                    std::thread::sleep(Duration::from_millis(
                        Self::RETRY_BACKOFF_MS * attempt as u64,
                    ));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn post(&self, query: &str) -> std::result::Result<AqlResponse, MetadataFetchError> {
        let mut request = self
            .client
            .post(&self.aql_url)
            .header(CONTENT_TYPE, "text/plain")
            .body(query.to_string());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(MetadataFetchError::Status {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<AqlResponse>()
            .map_err(|e| MetadataFetchError::Decode {
                details: e.to_string(),
            })
    }

    fn map_transport_error(error: reqwest::Error) -> MetadataFetchError {
        if error.is_timeout() {
            MetadataFetchError::Timeout {
                details: error.to_string(),
            }
        } else {
            MetadataFetchError::Transport {
                details: error.to_string(),
            }
        }
    }

    fn is_retryable(error: &MetadataFetchError) -> bool {
        match error {
            MetadataFetchError::Timeout { .. } | MetadataFetchError::Transport { .. } => true,
            MetadataFetchError::Status { status } => *status >= 500,
            MetadataFetchError::Decode { .. } => false,
        }
    }
}

/// AQL stores items at the repository root under path `.`.
fn aql_path(path: &str) -> &str {
    if path.is_empty() {
        "."
    } else {
        path
    }
}

/// Builds the disjunctive `items.find` query for a batch of locations.
fn build_query(locations: &[ArtifactLocation]) -> String {
    let clauses: Vec<Value> = locations
        .iter()
        .map(|location| {
            json!({
                "repo": { "$eq": location.repo },
                "path": { "$eq": aql_path(&location.path) },
                "name": { "$eq": location.name },
            })
        })
        .collect();

    format!(
        "items.find({}).include(\"repo\",\"path\",\"name\",\"property\")",
        json!({ "$or": clauses })
    )
}

fn build_metadata(properties: &[Property]) -> BuildMetadata {
    let value = |key: &str| {
        properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    BuildMetadata::new(
        value("build.name"),
        value("build.number"),
        value("build.timestamp"),
    )
    .with_checksum(value("sha256"))
}

/// Maps AQL items back to the requested keys; items nobody asked for are
/// dropped.
fn collect_results(
    requested: &HashMap<String, ArtifactKey>,
    response: AqlResponse,
) -> HashMap<ArtifactKey, BuildMetadata> {
    let mut found = HashMap::new();

    for item in response.results {
        let path = if item.path == "." { String::new() } else { item.path };
        let location = ArtifactLocation {
            repo: item.repo,
            path,
            name: item.name,
        };
        if let Some(key) = requested.get(&location.to_key_string()) {
            found.insert(key.clone(), build_metadata(&item.properties));
        }
    }

    found
}

impl RegistryMetadataSource for ArtifactoryClient {
    fn query(&self, key: &ArtifactKey) -> std::result::Result<Option<BuildMetadata>, MetadataFetchError> {
        let mut found = self.query_many(std::slice::from_ref(key))?;
        Ok(found.remove(key))
    }

    fn query_many(
        &self,
        keys: &[ArtifactKey],
    ) -> std::result::Result<HashMap<ArtifactKey, BuildMetadata>, MetadataFetchError> {
        let mut requested: HashMap<String, ArtifactKey> = HashMap::new();
        let mut locations = Vec::with_capacity(keys.len());

        for key in keys {
            match key.locate() {
                Some(location) => {
                    requested.insert(location.to_key_string(), key.clone());
                    locations.push(location);
                }
                None => {
                    tracing::debug!(artifact_key = %key, "key has no registry location");
                }
            }
        }

        if locations.is_empty() {
            return Ok(HashMap::new());
        }

        let query = build_query(&locations);
        tracing::debug!(artifacts = locations.len(), "querying registry");
        let response = self.post_with_retry(&query)?;
        Ok(collect_results(&requested, response))
    }
}

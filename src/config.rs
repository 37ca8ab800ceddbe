//! Configuration file support for repo-vuln.
//!
//! Provides YAML-based configuration through `repo-vuln.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::adapters::outbound::filesystem::JsonCacheStore;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "repo-vuln.config.yml";

type UnknownFields = BTreeMap<String, serde_yaml_ng::Value>;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub registry: Option<RegistryConfig>,
    pub cache: Option<CacheConfig>,
    pub matching: Option<MatchingConfig>,
    pub products: Option<Vec<ProductConfig>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

/// Artifact registry connection.
#[derive(Debug, Deserialize, Default)]
pub struct RegistryConfig {
    pub base_url: Option<String>,
    /// Environment variable holding a bearer token
    pub token_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub batch_size: Option<usize>,
    pub max_retries: Option<u32>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct CacheConfig {
    pub directory: Option<PathBuf>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct MatchingConfig {
    pub build_name_properties: Option<Vec<String>>,
    pub fuzzy: Option<bool>,
    pub local_repositories_only: Option<bool>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

/// One product: its vulnerability feed and known repositories.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProductConfig {
    pub name: String,
    pub feed: PathBuf,
    pub repositories: PathBuf,
}

/// Load config from an explicit path. Returns an error if the file is not found.
///
/// Relative product paths are resolved against the config file's directory.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let mut config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    if let Some(base_dir) = path.parent() {
        resolve_relative_paths(&mut config, base_dir);
    }

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn resolve_relative_paths(config: &mut ConfigFile, base_dir: &Path) {
    let resolve = |path: &mut PathBuf| {
        if path.is_relative() {
            *path = base_dir.join(&*path);
        }
    };

    if let Some(products) = config.products.as_mut() {
        for product in products {
            resolve(&mut product.feed);
            resolve(&mut product.repositories);
        }
    }
    if let Some(directory) = config.cache.as_mut().and_then(|c| c.directory.as_mut()) {
        resolve(directory);
    }
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(registry) = &config.registry {
        if registry.batch_size == Some(0) {
            bail!(
                "Invalid config: registry.batch_size must be at least 1.\n\n\
                 💡 Hint: The default is 100 artifacts per registry query."
            );
        }
        if registry.timeout_seconds == Some(0) {
            bail!("Invalid config: registry.timeout_seconds must be at least 1.");
        }
        if registry.max_retries == Some(0) {
            bail!("Invalid config: registry.max_retries must be at least 1.");
        }
        if let Some(token_env) = &registry.token_env {
            if token_env.trim().is_empty() {
                bail!("Invalid config: registry.token_env must not be empty.");
            }
        }
    }

    if let Some(properties) = config
        .matching
        .as_ref()
        .and_then(|m| m.build_name_properties.as_ref())
    {
        for (i, property) in properties.iter().enumerate() {
            if property.trim().is_empty() {
                bail!(
                    "Invalid config: matching.build_name_properties[{}] must not be empty.\n\n\
                     💡 Hint: List property keys such as \"build.name\" or \"path\".",
                    i
                );
            }
        }
    }

    if let Some(products) = &config.products {
        let mut seen = HashSet::new();
        let mut cache_files: HashMap<String, &str> = HashMap::new();
        for (i, product) in products.iter().enumerate() {
            let name = product.name.trim();
            if name.is_empty() {
                bail!(
                    "Invalid config: products[{}].name must not be empty.\n\n\
                     💡 Hint: Each product needs a unique 'name' (e.g., \"diagnostics\").",
                    i
                );
            }
            if !seen.insert(name.to_string()) {
                bail!(
                    "Invalid config: product '{}' is defined more than once.\n\n\
                     💡 Hint: Product names must be unique; each one gets its own cache file.",
                    name
                );
            }
            let stem = JsonCacheStore::file_stem(name).to_ascii_lowercase();
            if let Some(other) = cache_files.insert(stem, name) {
                bail!(
                    "Invalid config: products '{}' and '{}' would share the cache file '{}.json'.\n\n\
                     💡 Hint: Rename one of them. Cache file names replace characters other than\n\
                     letters, digits, '.', '-' and '_' with '_' and ignore case.",
                    other,
                    name,
                    JsonCacheStore::file_stem(name)
                );
            }
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let sections: [(&str, Option<&UnknownFields>); 4] = [
        ("", Some(&config.unknown_fields)),
        ("registry.", config.registry.as_ref().map(|r| &r.unknown_fields)),
        ("cache.", config.cache.as_ref().map(|c| &c.unknown_fields)),
        ("matching.", config.matching.as_ref().map(|m| &m.unknown_fields)),
    ];

    for (prefix, fields) in sections {
        for key in fields.into_iter().flat_map(|f| f.keys()) {
            tracing::warn!(field = %format!("{}{}", prefix, key), "unknown config field will be ignored");
        }
    }
}

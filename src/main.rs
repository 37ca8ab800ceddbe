mod cli;

use clap::Parser;
use cli::Args;
use repo_vuln::adapters::outbound::console::StderrProgressReporter;
use repo_vuln::adapters::outbound::filesystem::{FileSystemReader, JsonCacheStore};
use repo_vuln::adapters::outbound::formatters::JsonReportFormatter;
use repo_vuln::adapters::outbound::network::ArtifactorySettings;
use repo_vuln::application::dto::{MatchOptions, MatchRequest, RunReport};
use repo_vuln::application::factories::{
    PresenterFactory, PresenterType, RegistryFactory, RegistryType,
};
use repo_vuln::application::use_cases::{run_products, MatchVulnerabilitiesUseCase};
use repo_vuln::config::{discover_config, load_config_from_path, ConfigFile, CONFIG_FILENAME};
use repo_vuln::ports::inbound::VulnerabilityMatchingPort;
use repo_vuln::ports::outbound::{OutputPresenter, ReportFormatter};
use repo_vuln::shared::error::{ExitCode, RepoVulnError};
use repo_vuln::shared::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_PRODUCT: &str = "default";
const DEFAULT_CACHE_DIR: &str = ".aql-cache";
const DEFAULT_TOKEN_ENV: &str = "ARTIFACTORY_TOKEN";
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Everything a run needs once config file and flags are merged
#[derive(Debug)]
struct RunPlan {
    requests: Vec<MatchRequest>,
    registry: RegistryType,
    cache_dir: PathBuf,
    output: Option<PathBuf>,
    strict: bool,
}

fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        let code = if e.use_stderr() {
            ExitCode::InvalidArguments
        } else {
            ExitCode::Success
        };
        process::exit(code.as_i32());
    });

    init_tracing(args.log_level());

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            match discover_config(&cwd)? {
                Some(config) => {
                    eprintln!(
                        "📄 Auto-discovered config file: {}",
                        cwd.join(CONFIG_FILENAME).display()
                    );
                    config
                }
                None => ConfigFile::default(),
            }
        }
    };
    let plan = build_plan(&args, config)?;
    tracing::debug!(products = plan.requests.len(), cache_dir = %plan.cache_dir.display(), "run planned");

    let registry = plan.registry;
    let cache_dir = plan.cache_dir;
    let quiet = args.quiet;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let products = runtime.block_on(run_products(plan.requests, move |request| {
        let use_case = MatchVulnerabilitiesUseCase::new(
            FileSystemReader::new(),
            FileSystemReader::new(),
            RegistryFactory::create(registry.clone())?,
            JsonCacheStore::new(cache_dir.clone()),
            if quiet {
                StderrProgressReporter::quiet()
            } else {
                StderrProgressReporter::new()
            },
        );
        use_case.match_product(request)
    }))?;

    let report = RunReport::new(products);
    let formatted = JsonReportFormatter::new().format(&report)?;
    PresenterFactory::create(PresenterType::from_output(plan.output)).present(&formatted)?;

    if plan.strict && report.has_unmatched() {
        eprintln!("⚠️  Unattributed artifacts found (--strict)");
        return Ok(ExitCode::UnmatchedArtifacts);
    }
    Ok(ExitCode::Success)
}

/// Merges the config file with command-line flags. Flags win.
fn build_plan(args: &Args, config: ConfigFile) -> Result<RunPlan> {
    let registry_config = config.registry.unwrap_or_default();
    let matching = config.matching.unwrap_or_default();

    let mut options = MatchOptions::default();
    if let Some(properties) = matching.build_name_properties {
        options.build_name_properties = properties;
    }
    options.fuzzy = matching.fuzzy.unwrap_or(true) && !args.no_fuzzy;
    options.local_repositories_only =
        args.local_only || matching.local_repositories_only.unwrap_or(false);
    if let Some(batch_size) = args
        .batch_size
        .map(|n| n as usize)
        .or(registry_config.batch_size)
    {
        options.batch_size = batch_size;
    }

    let requests = match (&args.feed, &args.repositories) {
        (Some(feed), Some(repositories)) => vec![MatchRequest::new(
            args.product.as_deref().unwrap_or(DEFAULT_PRODUCT),
            feed.clone(),
            repositories.clone(),
            options,
        )],
        _ => {
            let products = config.products.unwrap_or_default();
            if products.is_empty() {
                return Err(RepoVulnError::InvalidConfig {
                    message: "no products to process.\n\n💡 Hint: Pass --feed and --repositories, \
                              or list products in repo-vuln.config.yml"
                        .to_string(),
                }
                .into());
            }

            let selected: Vec<_> = match &args.product {
                Some(name) => {
                    let found: Vec<_> = products.iter().filter(|p| p.name.trim() == name).collect();
                    if found.is_empty() {
                        return Err(RepoVulnError::UnknownProduct {
                            name: name.clone(),
                            known: products
                                .iter()
                                .map(|p| p.name.trim())
                                .collect::<Vec<_>>()
                                .join(", "),
                        }
                        .into());
                    }
                    found
                }
                None => products.iter().collect(),
            };

            selected
                .into_iter()
                .map(|p| {
                    MatchRequest::new(
                        p.name.trim(),
                        p.feed.clone(),
                        p.repositories.clone(),
                        options.clone(),
                    )
                })
                .collect()
        }
    };

    let registry = if args.offline {
        RegistryType::Offline
    } else {
        match args.registry_url.clone().or(registry_config.base_url) {
            Some(base_url) => {
                let token_env = registry_config
                    .token_env
                    .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
                let token = std::env::var(&token_env).ok();
                if token.is_none() {
                    tracing::debug!(token_env = %token_env, "no registry token in environment, querying anonymously");
                }
                RegistryType::Artifactory(ArtifactorySettings {
                    base_url,
                    token,
                    timeout: Duration::from_secs(
                        registry_config
                            .timeout_seconds
                            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
                    ),
                    max_retries: registry_config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
                })
            }
            None => {
                tracing::info!("no registry configured, matching offline");
                RegistryType::Offline
            }
        }
    };

    let cache_dir = args
        .cache_dir
        .clone()
        .or(config.cache.and_then(|c| c.directory))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

    Ok(RunPlan {
        requests,
        registry,
        cache_dir,
        output: args.output.clone(),
        strict: args.strict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use repo_vuln::config::{MatchingConfig, ProductConfig, RegistryConfig};

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("repo-vuln").chain(flags.iter().copied())).unwrap()
    }

    fn product(name: &str) -> ProductConfig {
        ProductConfig {
            name: name.to_string(),
            feed: PathBuf::from(format!("{}.json", name)),
            repositories: PathBuf::from("repos.json"),
        }
    }

    fn config_with_products(names: &[&str]) -> ConfigFile {
        ConfigFile {
            products: Some(names.iter().map(|n| product(n)).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_product_from_flags() {
        let plan = build_plan(
            &args(&["--feed", "f.json", "--repositories", "r.json"]),
            ConfigFile::default(),
        )
        .unwrap();

        assert_eq!(plan.requests.len(), 1);
        assert_eq!(plan.requests[0].product, DEFAULT_PRODUCT);
        assert_eq!(plan.requests[0].feed_path, PathBuf::from("f.json"));
        assert!(matches!(plan.registry, RegistryType::Offline));
        assert_eq!(plan.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
    }

    #[test]
    fn test_no_products_is_an_error() {
        let err = build_plan(&args(&[]), ConfigFile::default()).unwrap_err();
        assert!(format!("{}", err).contains("no products to process"));
    }

    #[test]
    fn test_product_filter_selects_configured_product() {
        let plan = build_plan(
            &args(&["--product", "billing"]),
            config_with_products(&["diagnostics", "billing"]),
        )
        .unwrap();

        assert_eq!(plan.requests.len(), 1);
        assert_eq!(plan.requests[0].product, "billing");
        assert_eq!(plan.requests[0].feed_path, PathBuf::from("billing.json"));
    }

    #[test]
    fn test_unknown_product_lists_known_ones() {
        let err = build_plan(
            &args(&["--product", "nope"]),
            config_with_products(&["diagnostics", "billing"]),
        )
        .unwrap_err();

        let message = format!("{}", err);
        assert!(message.contains("Unknown product: nope"));
        assert!(message.contains("diagnostics, billing"));
    }

    #[test]
    fn test_flags_override_config() {
        let config = ConfigFile {
            registry: Some(RegistryConfig {
                base_url: Some("https://config.example.com".to_string()),
                batch_size: Some(10),
                ..Default::default()
            }),
            matching: Some(MatchingConfig {
                fuzzy: Some(true),
                build_name_properties: Some(vec!["path".to_string()]),
                ..Default::default()
            }),
            ..config_with_products(&["diagnostics"])
        };

        let plan = build_plan(
            &args(&[
                "--registry-url",
                "https://cli.example.com",
                "--batch-size",
                "5",
                "--no-fuzzy",
                "--cache-dir",
                "/tmp/cache",
            ]),
            config,
        )
        .unwrap();

        let options = &plan.requests[0].options;
        assert_eq!(options.batch_size, 5);
        assert!(!options.fuzzy);
        assert_eq!(options.build_name_properties, vec!["path"]);
        assert_eq!(plan.cache_dir, PathBuf::from("/tmp/cache"));
        match plan.registry {
            RegistryType::Artifactory(settings) => {
                assert_eq!(settings.base_url, "https://cli.example.com");
                assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
                assert_eq!(settings.max_retries, DEFAULT_MAX_RETRIES);
            }
            other => panic!("expected Artifactory registry, got {:?}", other),
        }
    }

    #[test]
    fn test_offline_flag_ignores_configured_registry() {
        let config = ConfigFile {
            registry: Some(RegistryConfig {
                base_url: Some("https://config.example.com".to_string()),
                ..Default::default()
            }),
            ..config_with_products(&["diagnostics"])
        };

        let plan = build_plan(&args(&["--offline"]), config).unwrap();
        assert!(matches!(plan.registry, RegistryType::Offline));
    }
}

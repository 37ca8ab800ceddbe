/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the full flow from config file on disk through CLI invocation
/// to correct output, using `assert_cmd` and `tempfile` for isolated test environments.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy the fixture inputs into `dir/inputs` so config paths can be relative.
fn create_inputs(dir: &Path) {
    let inputs = dir.join("inputs");
    fs::create_dir_all(&inputs).unwrap();
    for name in ["feed.json", "feed-matched.json", "repos.json"] {
        fs::copy(fixtures_path().join(name), inputs.join(name)).unwrap();
    }
}

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

const TWO_PRODUCTS: &str = r#"
cache:
  directory: cache
products:
  - name: diagnostics
    feed: inputs/feed.json
    repositories: inputs/repos.json
  - name: billing
    feed: inputs/feed-matched.json
    repositories: inputs/repos.json
"#;

fn run_json(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Config File Auto-Discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_runs_every_product() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        write_config(&dir.path().join("repo-vuln.config.yml"), TWO_PRODUCTS);

        let output = cargo_bin_cmd!("repo-vuln")
            .current_dir(dir.path())
            .output()
            .unwrap();

        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Auto-discovered config file"));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let products = report["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["product"], "diagnostics");
        assert_eq!(products[1]["product"], "billing");
        assert_eq!(products[1]["totals"]["repoY"]["totals"]["medium"], 3);

        assert!(dir.path().join("cache/diagnostics.json").exists());
        assert!(dir.path().join("cache/billing.json").exists());
    }

    #[test]
    fn test_product_flag_selects_configured_product() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        write_config(&dir.path().join("repo-vuln.config.yml"), TWO_PRODUCTS);

        let report = run_json(
            cargo_bin_cmd!("repo-vuln")
                .current_dir(dir.path())
                .args(["--product", "billing"]),
        );

        let products = report["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["product"], "billing");
    }

    #[test]
    fn test_unknown_product_is_an_error() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        write_config(&dir.path().join("repo-vuln.config.yml"), TWO_PRODUCTS);

        cargo_bin_cmd!("repo-vuln")
            .current_dir(dir.path())
            .args(["--product", "payments"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Unknown product: payments"))
            .stderr(predicate::str::contains("diagnostics, billing"));
    }
}

// ============================================================================
// Explicit --config Tests
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_explicit_config_resolves_paths_relative_to_file() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        let config_path = dir.path().join("custom.yml");
        write_config(&config_path, TWO_PRODUCTS);

        let elsewhere = TempDir::new().unwrap();
        let report = run_json(
            cargo_bin_cmd!("repo-vuln")
                .current_dir(elsewhere.path())
                .args(["--config", &config_path.display().to_string()]),
        );

        assert_eq!(report["products"].as_array().unwrap().len(), 2);
        assert!(dir.path().join("cache/billing.json").exists());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        cargo_bin_cmd!("repo-vuln")
            .args(["--config", "/nonexistent/repo-vuln.config.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        write_config(&config_path, "registry:\n  batch_size: 0\n");

        cargo_bin_cmd!("repo-vuln")
            .args(["--config", &config_path.display().to_string()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("batch_size must be at least 1"));
    }

    #[test]
    fn test_unknown_fields_warn_but_run() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        let config_path = dir.path().join("config.yml");
        write_config(
            &config_path,
            &format!("{}\nformat: markdown\nmatching:\n  strategy: loose\n", TWO_PRODUCTS),
        );

        cargo_bin_cmd!("repo-vuln")
            .args(["--config", &config_path.display().to_string(), "--offline"])
            .assert()
            .success()
            .stderr(predicate::str::contains("unknown config field"))
            .stderr(predicate::str::contains("matching.strategy"));
    }
}

// ============================================================================
// CLI Override Tests
// ============================================================================

mod cli_override_tests {
    use super::*;

    #[test]
    fn test_cli_no_fuzzy_overrides_config() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        write_config(
            &dir.path().join("repo-vuln.config.yml"),
            &format!("{}\nmatching:\n  fuzzy: true\n", TWO_PRODUCTS),
        );

        let report = run_json(
            cargo_bin_cmd!("repo-vuln")
                .current_dir(dir.path())
                .args(["--product", "diagnostics", "--no-fuzzy"]),
        );

        let product = &report["products"][0];
        assert_eq!(product["unmatched"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_cli_feed_overrides_configured_products() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        write_config(&dir.path().join("repo-vuln.config.yml"), TWO_PRODUCTS);

        let report = run_json(cargo_bin_cmd!("repo-vuln").current_dir(dir.path()).args([
            "--feed",
            "inputs/feed-matched.json",
            "--repositories",
            "inputs/repos.json",
            "--product",
            "adhoc",
        ]));

        let products = report["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["product"], "adhoc");
        assert!(dir.path().join("cache/adhoc.json").exists());
    }

    #[test]
    fn test_cli_cache_dir_overrides_config() {
        let dir = TempDir::new().unwrap();
        create_inputs(dir.path());
        write_config(&dir.path().join("repo-vuln.config.yml"), TWO_PRODUCTS);
        let cache_dir = TempDir::new().unwrap();

        cargo_bin_cmd!("repo-vuln")
            .current_dir(dir.path())
            .args([
                "--product",
                "billing",
                "--cache-dir",
                &cache_dir.path().display().to_string(),
            ])
            .assert()
            .success();

        assert!(cache_dir.path().join("billing.json").exists());
        assert!(!dir.path().join("cache/billing.json").exists());
    }
}

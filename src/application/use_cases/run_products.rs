use crate::application::dto::{MatchRequest, ProductReport};
use crate::shared::Result;
use anyhow::Context;
use futures::future::join_all;
use std::sync::Arc;

/// Runs several products concurrently, one blocking task each.
///
/// Each product's pipeline is synchronous and owns its cache, registry
/// client and cache file, so tasks share nothing mutable. `run_one` is
/// called on a blocking thread and must build its own collaborators there.
///
/// Reports come back in request order. The first failing product fails the
/// whole run; the others still finish.
pub async fn run_products<F>(requests: Vec<MatchRequest>, run_one: F) -> Result<Vec<ProductReport>>
where
    F: Fn(MatchRequest) -> Result<ProductReport> + Send + Sync + 'static,
{
    let run_one = Arc::new(run_one);

    let tasks = requests.into_iter().map(|request| {
        let run_one = Arc::clone(&run_one);
        let product = request.product.clone();
        let handle = tokio::task::spawn_blocking(move || run_one(request));
        async move { (product, handle.await) }
    });

    let mut reports = Vec::new();
    for (product, joined) in join_all(tasks).await {
        let outcome = joined.with_context(|| format!("Product '{}' run was aborted", product))?;
        let report = outcome.with_context(|| format!("Product '{}' failed", product))?;
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{MatchOptions, RunStatistics};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(product: &str) -> MatchRequest {
        MatchRequest::new(
            product,
            PathBuf::from(format!("{}.json", product)),
            PathBuf::from("repos.json"),
            MatchOptions::default(),
        )
    }

    fn empty_report(product: &str) -> ProductReport {
        ProductReport {
            product: product.to_string(),
            totals: BTreeMap::new(),
            unmatched: Vec::new(),
            ambiguous: Vec::new(),
            rejected: Vec::new(),
            stats: RunStatistics::default(),
        }
    }

    #[tokio::test]
    async fn test_reports_keep_request_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let reports = run_products(
            vec![request("diagnostics"), request("intel"), request("payments")],
            move |req| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(empty_report(&req.product))
            },
        )
        .await
        .unwrap();

        let names: Vec<_> = reports.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["diagnostics", "intel", "payments"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failing_product_fails_run() {
        let result = run_products(vec![request("diagnostics"), request("intel")], |req| {
            if req.product == "intel" {
                anyhow::bail!("feed missing");
            }
            Ok(empty_report(&req.product))
        })
        .await;

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Product 'intel' failed"));
        assert!(format!("{:#}", err).contains("feed missing"));
    }

    #[tokio::test]
    async fn test_no_products() {
        let reports = run_products(Vec::new(), |req| Ok(empty_report(&req.product)))
            .await
            .unwrap();
        assert!(reports.is_empty());
    }
}

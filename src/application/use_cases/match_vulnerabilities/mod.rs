use crate::application::cache::AqlMetadataCache;
use crate::application::dto::{
    AmbiguousArtifact, MatchOptions, MatchRequest, ProductReport, RunStatistics, UnmatchedArtifact,
};
use crate::ports::inbound::VulnerabilityMatchingPort;
use crate::ports::outbound::{
    CacheStore, ProgressReporter, RegistryMetadataSource, RepositoryListReader,
    VulnerabilityFeedReader,
};
use crate::shared::Result;
use crate::vulnerability_matching::domain::{
    ArtifactKey, ArtifactRecord, MatchResult, RepositoryIndex, UnmatchedReason,
};
use crate::vulnerability_matching::services::{
    ArtifactNormalizer, MatchedArtifact, RepositoryMatcher, VulnerabilityAggregator,
};
use std::collections::HashSet;


/// MatchVulnerabilitiesUseCase - attributes one product's artifacts to
/// source repositories
///
/// Generic dependency injection for every infrastructure dependency.
///
/// # Type Parameters
/// * `FR` - VulnerabilityFeedReader implementation
/// * `RR` - RepositoryListReader implementation
/// * `REG` - RegistryMetadataSource implementation
/// * `CS` - CacheStore implementation
/// * `PR` - ProgressReporter implementation
pub struct MatchVulnerabilitiesUseCase<FR, RR, REG, CS, PR> {
    feed_reader: FR,
    repository_reader: RR,
    registry: REG,
    cache_store: CS,
    progress_reporter: PR,
}

impl<FR, RR, REG, CS, PR> MatchVulnerabilitiesUseCase<FR, RR, REG, CS, PR>
where
    FR: VulnerabilityFeedReader,
    RR: RepositoryListReader,
    REG: RegistryMetadataSource,
    CS: CacheStore,
    PR: ProgressReporter,
{
    pub fn new(
        feed_reader: FR,
        repository_reader: RR,
        registry: REG,
        cache_store: CS,
        progress_reporter: PR,
    ) -> Self {
        Self {
            feed_reader,
            repository_reader,
            registry,
            cache_store,
            progress_reporter,
        }
    }

    /// Runs the pipeline for one product
    ///
    /// normalize → index → seed cache → fetch misses → resolve → match →
    /// aggregate → persist cache
    pub fn execute(&self, request: MatchRequest) -> Result<ProductReport> {
        let product = request.product.as_str();
        let options = &request.options;

        // Step 1: Load and normalize the feed
        self.progress_reporter.report(&format!(
            "📖 [{}] Loading vulnerability feed from: {}",
            product,
            request.feed_path.display()
        ));
        let raw_entries = self.feed_reader.read_feed(&request.feed_path)?;
        let feed = ArtifactNormalizer::normalize_all(raw_entries);
        if !feed.rejected.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  [{}] Rejected {} malformed feed entr{}",
                product,
                feed.rejected.len(),
                if feed.rejected.len() == 1 { "y" } else { "ies" }
            ));
        }

        // Step 2: Build the repository index
        let repositories = self
            .repository_reader
            .read_repositories(&request.repositories_path)?;
        let index = RepositoryIndex::build(&repositories);
        self.progress_reporter.report(&format!(
            "✅ [{}] {} artifact(s), {} repositor{}",
            product,
            feed.records.len(),
            index.repository_count(),
            if index.repository_count() == 1 { "y" } else { "ies" }
        ));

        // Step 3: Seed the run-scoped cache
        let cache = AqlMetadataCache::with_batch_size(&self.registry, options.batch_size);
        self.seed_cache(product, &cache);

        // Step 4: Fetch metadata for artifacts not cached yet
        let (queryable, registry_skipped) = Self::queryable_keys(&feed.records, options);
        let outcome = cache.fetch_batch_with_progress(&queryable, |done, total| {
            self.progress_reporter
                .report_progress(done, total, Some("querying registry"));
        });
        if !outcome.failed.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  [{}] Registry metadata unavailable for {} artifact(s)",
                product,
                outcome.failed.len()
            ));
        }

        // Step 5: Resolve and match
        let matcher = RepositoryMatcher::new(options.build_name_properties.clone(), options.fuzzy);
        let mut matched: Vec<MatchedArtifact> = Vec::new();
        let mut ambiguous: Vec<AmbiguousArtifact> = Vec::new();
        let mut unmatched: Vec<UnmatchedArtifact> = Vec::new();
        let mut reported_names: HashSet<String> = HashSet::new();
        let artifact_count = feed.records.len();

        for mut record in feed.records {
            if let Some(error) = outcome.failed.get(record.artifact_key()) {
                unmatched.push(Self::unmatched(
                    &record,
                    UnmatchedReason::MetadataFetchFailed {
                        details: error.to_string(),
                    },
                ));
                continue;
            }

            if let Some(metadata) = outcome
                .entries
                .get(record.artifact_key())
                .and_then(|entry| entry.metadata())
            {
                record.resolve_build(metadata);
            }

            match matcher.match_artifact(&record, &index) {
                MatchResult::Matched {
                    repo_id,
                    matched_name,
                    ..
                } => matched.push(MatchedArtifact::new(record, repo_id, matched_name)),
                MatchResult::Ambiguous(ambiguity) => {
                    ambiguous.push(AmbiguousArtifact {
                        artifact_key: record.artifact_key().clone(),
                        ambiguity: ambiguity.clone(),
                    });
                    matched.push(MatchedArtifact::new(
                        record,
                        ambiguity.chosen,
                        ambiguity.matched_name,
                    ));
                }
                MatchResult::Unmatched { reason } => {
                    Self::warn_unmapped_once(product, &record, &mut reported_names);
                    unmatched.push(Self::unmatched(&record, reason));
                }
            }
        }

        // Step 6: Aggregate
        let matched_count = matched.len() - ambiguous.len();
        let mut totals = VulnerabilityAggregator::aggregate(matched);
        VulnerabilityAggregator::apply_top_level(&mut totals, &index);

        // Step 7: Persist positive cache entries; failure only costs a warm start
        self.persist_cache(product, &cache);

        let stats = RunStatistics {
            artifacts: artifact_count,
            matched: matched_count,
            ambiguous: ambiguous.len(),
            unmatched: unmatched.len(),
            rejected: feed.rejected.len(),
            registry_skipped,
            cache: cache.stats(),
        };
        tracing::info!(product, ?stats, "product run finished");

        self.progress_reporter.report_completion(&format!(
            "✅ [{}] {} matched, {} ambiguous, {} unmatched across {} repositor{}",
            product,
            stats.matched,
            stats.ambiguous,
            stats.unmatched,
            totals.len(),
            if totals.len() == 1 { "y" } else { "ies" }
        ));

        Ok(ProductReport {
            product: request.product,
            totals,
            unmatched,
            ambiguous,
            rejected: feed.rejected,
            stats,
        })
    }

    fn seed_cache(&self, product: &str, cache: &AqlMetadataCache<&REG>) {
        match self.cache_store.load(product) {
            Ok(entries) => {
                let seeded = cache.seed(entries);
                tracing::debug!(product, seeded, "metadata cache seeded");
            }
            Err(e) => {
                tracing::warn!(product, error = %e, "ignoring unreadable metadata cache");
            }
        }
    }

    fn persist_cache(&self, product: &str, cache: &AqlMetadataCache<&REG>) {
        if let Err(e) = self.cache_store.save(product, &cache.snapshot()) {
            tracing::warn!(product, error = %e, "failed to persist metadata cache");
            self.progress_reporter.report_error(&format!(
                "⚠️  [{}] Could not save the metadata cache: {}",
                product, e
            ));
        }
    }

    /// Keys worth a registry query, plus the number left out.
    fn queryable_keys(records: &[ArtifactRecord], options: &MatchOptions) -> (Vec<ArtifactKey>, usize) {
        let mut keys = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            let key = record.artifact_key();
            if options.local_repositories_only && !key.is_local_repository() {
                skipped += 1;
                continue;
            }
            if key.locate().is_none() {
                tracing::debug!(artifact_key = %key, "key has no registry location, skipping lookup");
                skipped += 1;
                continue;
            }
            keys.push(key.clone());
        }

        (keys, skipped)
    }

    /// Unmapped build names are a data-quality signal; log each name once
    /// per run rather than once per artifact.
    fn warn_unmapped_once(product: &str, record: &ArtifactRecord, reported: &mut HashSet<String>) {
        let Some(build_name) = record.build_name() else {
            return;
        };
        if reported.insert(build_name.to_string()) {
            tracing::warn!(
                product,
                build_name,
                "build name is not mapped to any repository"
            );
        }
    }

    fn unmatched(record: &ArtifactRecord, reason: UnmatchedReason) -> UnmatchedArtifact {
        UnmatchedArtifact {
            artifact_key: record.artifact_key().clone(),
            repo_name: record.repo_name().to_string(),
            build_name: record.build_name().map(String::from),
            severities: *record.severities(),
            reason,
        }
    }
}

impl<FR, RR, REG, CS, PR> VulnerabilityMatchingPort for MatchVulnerabilitiesUseCase<FR, RR, REG, CS, PR>
where
    FR: VulnerabilityFeedReader,
    RR: RepositoryListReader,
    REG: RegistryMetadataSource,
    CS: CacheStore,
    PR: ProgressReporter,
{
    fn match_product(&self, request: MatchRequest) -> Result<ProductReport> {
        self.execute(request)
    }
}

//! CategorizationEngine: the public facade over the tiered pipeline.
//!
//! Wires the pattern store, the semantic index, and the resilient
//! remote classifier into one `categorize` path, and carries the
//! management surface (feedback, rebuild, reactivation, usage) around
//! it. Works purely in memory, or write-through against an attached
//! [`IExpenseStore`] repository.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use glint_core::constants::MAX_WARM_BATCH_SIZE;
use glint_core::errors::{GlintError, InferenceError, StoreError};
use glint_core::models::{
    CategorizationOutcome, ClassifyInput, EmbeddingRecord, FeedbackKind, HistoricalExpense,
    HistoryEntry, Pattern, TierKind, TierResolution, TierUsageRecord, UsageSummary,
};
use glint_core::normalize::normalize;
use glint_core::traits::{IClassifier, IEmbedder, IExpenseStore};
use glint_core::{GlintConfig, GlintResult};
use glint_inference::BreakerState;
use glint_observability::tracing_setup::events;
use glint_observability::{alerting, UsageAlert, UsageTracker};
use glint_patterns::{FeedbackManager, FeedbackOutcome, PatternStore, RebuildReport};
use glint_similarity::SimilarityEngine;

use crate::policy;
use crate::singleflight::KeyedFlights;
use crate::tiers::{ExactTier, RemoteTier, SemanticTier};

/// What a warm-up import did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarmReport {
    /// Rows folded into patterns (and history, when storage is attached).
    pub rows_imported: usize,
    /// Rows dropped for having no usable key.
    pub rows_skipped: usize,
    /// Distinct keys embedded into the semantic index.
    pub keys_indexed: usize,
}

/// The tiered expense-categorization engine.
pub struct CategorizationEngine {
    config: GlintConfig,
    patterns: Arc<PatternStore>,
    similarity: Arc<SimilarityEngine>,
    exact: ExactTier,
    semantic: SemanticTier,
    remote: RemoteTier,
    feedback: FeedbackManager,
    usage: UsageTracker,
    flights: KeyedFlights,
    store: Option<Arc<dyn IExpenseStore>>,
}

impl CategorizationEngine {
    /// In-memory engine: nothing survives a restart.
    pub fn new(
        embedder: Arc<dyn IEmbedder>,
        classifier: Arc<dyn IClassifier>,
        config: GlintConfig,
    ) -> GlintResult<Self> {
        Self::build(embedder, classifier, None, config)
    }

    /// Engine backed by a durable repository. Pattern and embedding
    /// state is hydrated from it before the engine serves anything.
    pub fn with_store(
        embedder: Arc<dyn IEmbedder>,
        classifier: Arc<dyn IClassifier>,
        store: Arc<dyn IExpenseStore>,
        config: GlintConfig,
    ) -> GlintResult<Self> {
        let engine = Self::build(embedder, classifier, Some(store), config)?;
        engine.hydrate()?;
        Ok(engine)
    }

    fn build(
        embedder: Arc<dyn IEmbedder>,
        classifier: Arc<dyn IClassifier>,
        store: Option<Arc<dyn IExpenseStore>>,
        config: GlintConfig,
    ) -> GlintResult<Self> {
        let patterns = Arc::new(match &store {
            Some(repository) => {
                PatternStore::with_repository(config.suppression.clone(), Arc::clone(repository))
            }
            None => PatternStore::new(config.suppression.clone()),
        });
        let similarity = Arc::new(SimilarityEngine::new(embedder, config.similarity.clone())?);

        let exact = ExactTier::new(Arc::clone(&patterns), &config.policy);
        let semantic = SemanticTier::new(Arc::clone(&similarity), Arc::clone(&patterns));
        let remote = RemoteTier::new(classifier, config.resilience.clone());
        let feedback = FeedbackManager::new(Arc::clone(&patterns), store.clone());
        let usage = UsageTracker::new(config.usage.clone());

        info!(
            match_threshold = config.similarity.match_threshold,
            high_threshold = config.policy.high_threshold,
            durable = store.is_some(),
            "categorization engine assembled"
        );

        Ok(Self {
            config,
            patterns,
            similarity,
            exact,
            semantic,
            remote,
            feedback,
            usage,
            flights: KeyedFlights::new(),
            store,
        })
    }

    fn hydrate(&self) -> GlintResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let patterns = self.patterns.load_from_repository()?;
        let embeddings = self.similarity.load_records(store.load_embeddings()?);
        info!(patterns, embeddings, "engine state hydrated from storage");
        Ok(())
    }

    /// Categorize one expense.
    ///
    /// Expected conditions (no match, low confidence, classifier
    /// refusing calls) come back inside the outcome; an `Err` means the
    /// request itself failed, from a storage fault or inconsistent
    /// state.
    pub async fn categorize(
        &self,
        description: &str,
        amount: f64,
    ) -> GlintResult<CategorizationOutcome> {
        let request_id = Uuid::new_v4();
        let key = normalize(description);
        let span = glint_observability::categorize_span!(request_id, key);
        self.categorize_inner(request_id, key.as_str(), description, amount)
            .instrument(span)
            .await
    }

    async fn categorize_inner(
        &self,
        request_id: Uuid,
        key: &str,
        description: &str,
        amount: f64,
    ) -> GlintResult<CategorizationOutcome> {
        self.usage.record_request();

        // Tier 1: exact pattern lookup.
        let started = Instant::now();
        let exact_hit = self.exact.resolve(key);
        self.track(TierKind::Exact, started, 0.0, true);
        if let Some(resolution) = exact_hit {
            return self.finish_resolved(request_id, key, description, amount, resolution);
        }

        // Tier 2: nearest confirmed key by cosine similarity.
        let started = Instant::now();
        match self.semantic.resolve(key).await {
            Ok(Some(resolution)) => {
                self.track(TierKind::Semantic, started, 0.0, true);
                return self.finish_resolved(request_id, key, description, amount, resolution);
            }
            Ok(None) => {
                self.track(TierKind::Semantic, started, 0.0, true);
            }
            Err(e) => {
                self.track(TierKind::Semantic, started, 0.0, false);
                error!(request_id = %request_id, key, error = %e, "semantic tier failed the request");
                return Err(e);
            }
        }

        // Tier 3: remote classification, coalesced per key so that
        // concurrent misses share one paid call.
        let outcome = self
            .resolve_remote(request_id, key, description, amount)
            .await;
        self.flights.release(key);
        outcome
    }

    async fn resolve_remote(
        &self,
        request_id: Uuid,
        key: &str,
        description: &str,
        amount: f64,
    ) -> GlintResult<CategorizationOutcome> {
        let _flight = self.flights.acquire(key).await;

        // A coalesced winner may have upserted the pattern while this
        // request waited; one more exact lookup avoids paying twice for
        // the same key.
        let started = Instant::now();
        if let Some(resolution) = self.exact.resolve(key) {
            self.track(TierKind::Exact, started, 0.0, true);
            debug!(request_id = %request_id, key, "coalesced onto a completed remote flight");
            return self.finish_resolved(request_id, key, description, amount, resolution);
        }

        let input = ClassifyInput {
            description: description.to_string(),
            amount,
        };
        let started = Instant::now();
        let (result, dispatched) = self.remote.resolve(&input).await;
        let cost = f64::from(dispatched) * self.usage.remote_call_cost();

        match result {
            Ok(resolution) => {
                self.track(TierKind::Remote, started, cost, true);
                self.finish_resolved(request_id, key, description, amount, resolution)
            }
            Err(GlintError::InferenceError(e)) => {
                let outcome = if matches!(e, InferenceError::Rejected { .. }) {
                    // A rejection is the service answering "no code
                    // fits"; the expense stays uncategorized.
                    self.track(TierKind::Remote, started, cost, true);
                    debug!(request_id = %request_id, key, error = %e, "classifier rejected the expense");
                    policy::unresolved(request_id, key)
                } else {
                    self.track(TierKind::Remote, started, cost, false);
                    warn!(request_id = %request_id, key, error = %e, "remote tier unavailable");
                    policy::unavailable(request_id, key)
                };
                events::categorization_unresolved(
                    &request_id.to_string(),
                    key,
                    policy::action_name(outcome.action),
                );
                Ok(outcome)
            }
            Err(other) => {
                self.track(TierKind::Remote, started, cost, false);
                Err(other)
            }
        }
    }

    /// Close out a resolved request: upsert the pattern, append the
    /// history row, and band the outcome.
    fn finish_resolved(
        &self,
        request_id: Uuid,
        key: &str,
        description: &str,
        amount: f64,
        resolution: TierResolution,
    ) -> GlintResult<CategorizationOutcome> {
        // Every resolution is one more observation of this key, no
        // matter which tier produced it. This is also what turns a
        // remote answer into the next request's exact hit.
        self.patterns.upsert(key, &resolution.gl_code, amount)?;

        let tier = resolution.source;
        let gl_code = resolution.gl_code.clone();
        let outcome = policy::resolved(request_id, key, resolution, &self.config.policy);

        if let Some(store) = &self.store {
            let entry = HistoryEntry::new(key, description, amount, gl_code.as_str(), false);
            store.append_history(&entry)?;
        }

        events::categorization_resolved(&request_id.to_string(), key, tier.as_str(), &gl_code);
        Ok(outcome)
    }

    /// Record one tier invocation to the in-memory tracker and, when a
    /// repository is attached, to the durable usage log. Telemetry
    /// writes never fail a request.
    fn track(&self, tier: TierKind, started: Instant, cost_units: f64, success: bool) {
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        let record = TierUsageRecord::new(tier, latency_ms, cost_units, success);
        if let Some(store) = &self.store {
            if let Err(e) = store.append_usage(&record) {
                warn!(tier = %tier, error = %e, "usage record not persisted");
            }
        }
        self.usage.record(record);
    }

    /// Record a human judgement on a served prediction.
    ///
    /// A confirmation is also what creates vectors: the key joins the
    /// semantic index under its confirmed code.
    pub async fn submit_feedback(
        &self,
        key: &str,
        predicted: &str,
        actual: &str,
    ) -> GlintResult<FeedbackOutcome> {
        let key = normalize(key);
        let span = glint_observability::feedback_span!(key);
        async {
            let outcome = self.feedback.submit(key.as_str(), predicted, actual)?;
            events::feedback_received(key.as_str(), outcome.event.kind.as_str());

            if outcome.event.kind == FeedbackKind::Confirmed {
                let record = self.similarity.index_key(key.as_str(), actual).await?;
                if let Some(store) = &self.store {
                    store.save_embedding(&record)?;
                }
            }
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// Look up the pattern for a key or raw description.
    pub fn get_pattern(&self, key: &str) -> Option<Pattern> {
        self.patterns.get(normalize(key).as_str())
    }

    /// Snapshot of stored patterns, sorted by key. Suppressed patterns
    /// are included only on request.
    pub fn list_patterns(&self, include_suppressed: bool) -> Vec<Pattern> {
        self.patterns.list(include_suppressed)
    }

    /// Manually lift suppression from a pattern.
    pub fn reactivate(&self, key: &str) -> GlintResult<Pattern> {
        let key = normalize(key);
        let pattern = self.patterns.reactivate(key.as_str())?;
        events::pattern_reactivated(key.as_str());
        Ok(pattern)
    }

    /// Rebuild the pattern set and the embedding index from confirmed
    /// history, replaying the feedback log for tallies. Requires an
    /// attached repository.
    pub async fn rebuild_patterns(&self) -> GlintResult<RebuildReport> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StoreError::RepositoryUnavailable {
                operation: "rebuild_patterns".to_string(),
            })?;

        let history = store.confirmed_history()?;
        let feedback = store.load_feedback()?;
        let previous = self.patterns.list(true);

        let span = glint_observability::rebuild_span!(history.len());
        async {
            let (rebuilt, report) = glint_patterns::rebuild_patterns(
                &history,
                &feedback,
                &previous,
                &self.config.suppression,
            );

            // The index is derived state: re-embed every surviving key,
            // then swap patterns and embeddings wholesale.
            let mut records = Vec::with_capacity(rebuilt.len());
            for pattern in &rebuilt {
                let vector = self.similarity.embed_cached(&pattern.key).await?;
                records.push(EmbeddingRecord::new(
                    pattern.key.as_str(),
                    pattern.gl_code.as_str(),
                    vector,
                ));
            }

            self.patterns.replace_all(rebuilt)?;
            store.replace_embeddings(&records)?;
            let indexed = self.similarity.load_records(records);

            events::rebuild_completed(report.patterns_rebuilt, indexed);
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Seed patterns, history, and the semantic index from already-coded
    /// expenses, typically an export from an accounting system.
    ///
    /// Rows import in order and count as confirmed truth. Each distinct
    /// key is embedded once, under the code of its latest row. Rows
    /// whose key normalizes to the unknown sentinel are skipped rather
    /// than pooled under one junk key.
    pub async fn warm_from_history(
        &self,
        rows: Vec<HistoricalExpense>,
    ) -> GlintResult<WarmReport> {
        let span = glint_observability::warm_span!(rows.len());
        async {
            let mut report = WarmReport::default();
            let mut codes: BTreeMap<String, String> = BTreeMap::new();

            for chunk in rows.chunks(MAX_WARM_BATCH_SIZE) {
                for row in chunk {
                    let source = row.vendor.as_deref().unwrap_or(&row.description);
                    let key = normalize(source);
                    if key.is_unknown() {
                        report.rows_skipped += 1;
                        debug!(description = %row.description, "skipped warm-up row with a content-free key");
                        continue;
                    }

                    self.patterns
                        .upsert(key.as_str(), &row.gl_code, row.amount)?;
                    if let Some(store) = &self.store {
                        let mut entry = HistoryEntry::new(
                            key.as_str(),
                            row.description.as_str(),
                            row.amount,
                            row.gl_code.as_str(),
                            true,
                        );
                        entry.recorded_at = row.occurred_at;
                        store.append_history(&entry)?;
                    }
                    codes.insert(key.into_string(), row.gl_code.clone());
                    report.rows_imported += 1;
                }
                debug!(rows = chunk.len(), "warm-up chunk applied");
            }

            for (key, gl_code) in &codes {
                let record = self.similarity.index_key(key, gl_code).await?;
                if let Some(store) = &self.store {
                    store.save_embedding(&record)?;
                }
            }
            report.keys_indexed = codes.len();

            events::history_import_completed(report.rows_imported, report.keys_indexed);
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Per-tier usage over `window_secs`, defaulting to the configured
    /// summary window.
    pub fn usage_summary(&self, window_secs: Option<u64>) -> UsageSummary {
        let window = window_secs.unwrap_or_else(|| self.usage.default_window_secs());
        self.usage.summary(window)
    }

    /// Alerts derived from current usage, the stalled-pipeline
    /// signature included.
    pub fn usage_alerts(&self, window_secs: Option<u64>) -> Vec<UsageAlert> {
        alerting::evaluate(&self.usage_summary(window_secs))
    }

    /// Current circuit-breaker state of the remote tier.
    pub fn breaker_state(&self) -> BreakerState {
        self.remote.breaker_state()
    }
}

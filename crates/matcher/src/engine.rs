use std::sync::Arc;
use std::time::Instant;

use canonical::{canonicalize, CanonicalizeConfig};
use chrono::Utc;
use corpus::{passes_filters, CorpusDocument, CorpusEntry, CorpusStore, DocumentId, InMemoryCorpus};
use perceptual::{compare, MinHasher, PerceptualConfig, PerceptualFingerprint, Signature};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::metrics::metrics_recorder;
use crate::stats::UniquenessStats;
use crate::types::{CheckResult, ComparisonResult, MatchConfig, MatchError, NewDocument, ScopeParams};


/// Scans a corpus for documents similar to a submitted text.
///
/// Holds only immutable configuration and a shared store handle, so one
/// instance can serve concurrent checks.
pub struct Matcher {
    store: Arc<dyn CorpusStore>,
    canonical_cfg: CanonicalizeConfig,
    hasher: MinHasher,
    cfg: MatchConfig,
}

impl Matcher {
    /// Construct a matcher over `store` with explicit configs.
    pub fn new(
        store: Arc<dyn CorpusStore>,
        canonical_cfg: CanonicalizeConfig,
        perceptual_cfg: PerceptualConfig,
        cfg: MatchConfig,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        canonical_cfg
            .validate()
            .map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        let hasher =
            MinHasher::new(perceptual_cfg).map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            store,
            canonical_cfg,
            hasher,
            cfg,
        })
    }

    /// Default configuration over an existing store.
    pub fn with_store(store: Arc<dyn CorpusStore>) -> Result<Self, MatchError> {
        Self::new(
            store,
            CanonicalizeConfig::default(),
            PerceptualConfig::default(),
            MatchConfig::default(),
        )
    }

    /// Convenience helper backed by an empty in-memory corpus.
    pub fn in_memory_default() -> Result<Self, MatchError> {
        Self::with_store(Arc::new(InMemoryCorpus::new()))
    }

    pub fn store(&self) -> &Arc<dyn CorpusStore> {
        &self.store
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    pub fn perceptual_config(&self) -> &PerceptualConfig {
        self.hasher.config()
    }

    fn validate_text(&self, raw_text: &str) -> Result<(), MatchError> {
        if raw_text.trim().is_empty() {
            return Err(MatchError::Validation("text is required".into()));
        }
        let chars = raw_text.chars().count();
        if chars < self.cfg.min_text_chars {
            return Err(MatchError::Validation(format!(
                "text must be at least {} characters (got {chars})",
                self.cfg.min_text_chars
            )));
        }
        Ok(())
    }

    fn resolve_top_k(&self, scope: &ScopeParams) -> Result<usize, MatchError> {
        match scope.top_k {
            Some(0) => Err(MatchError::Validation(
                "top_k must be greater than zero".into(),
            )),
            Some(k) => Ok(k),
            None => Ok(self.cfg.top_k),
        }
    }

    /// Validate, normalize, shingle and sign a text.
    pub fn fingerprint_text(&self, raw_text: &str) -> Result<PerceptualFingerprint, MatchError> {
        self.validate_text(raw_text)?;
        let doc = canonicalize(raw_text, &self.canonical_cfg)?;
        let fingerprint = self.hasher.fingerprint(&doc.tokens);
        debug!(
            tokens = doc.token_count(),
            shingles = fingerprint.shingle_count,
            boilerplate_stripped = doc.boilerplate.any(),
            "text fingerprinted"
        );
        Ok(fingerprint)
    }

    /// Signature of a text, for a store to persist alongside the document.
    pub fn ingest_signature(&self, raw_text: &str) -> Result<Signature, MatchError> {
        Ok(self.fingerprint_text(raw_text)?.signature)
    }

    /// Fingerprint a document and append it to the corpus.
    pub fn ingest_document(&self, doc: NewDocument) -> Result<DocumentId, MatchError> {
        let fingerprint = self.fingerprint_text(&doc.text)?;
        let entry = CorpusEntry {
            title: doc.title,
            category: doc.category,
            institution: doc.institution,
            owner: doc.owner,
            status: doc.status,
            created_at: Utc::now(),
            signature: fingerprint.signature,
            shingle_count: fingerprint.shingle_count,
        };
        let id = self.store.append(entry)?;
        info!(id, shingles = fingerprint.shingle_count, "document ingested");
        Ok(id)
    }

    pub fn remove_document(&self, id: DocumentId) -> Result<bool, MatchError> {
        Ok(self.store.remove(id)?)
    }

    /// Store the uniqueness of `result` as the originality of document `id`.
    /// Returns `false` when the document is unknown.
    pub fn record_originality(
        &self,
        id: DocumentId,
        result: &CheckResult,
    ) -> Result<bool, MatchError> {
        let recorded = self
            .store
            .set_originality(id, f64::from(result.uniqueness_percent))?;
        if recorded {
            debug!(id, originality = result.uniqueness_percent, "originality recorded");
        }
        Ok(recorded)
    }

    /// Uniqueness distribution over every stored document with a recorded
    /// originality.
    pub fn uniqueness_stats(&self) -> Result<UniquenessStats, MatchError> {
        let documents = self.store.fetch_candidates(None, None)?;
        Ok(UniquenessStats::from_documents(&documents))
    }

    /// Check a text against the corpus within `scope`.
    ///
    /// Input is validated before any work is done. A store failure aborts the
    /// check; an empty scope is a normal result with 100 % uniqueness.
    pub fn check_document(
        &self,
        raw_text: &str,
        scope: &ScopeParams,
    ) -> Result<CheckResult, MatchError> {
        let start = Instant::now();
        let outcome = self.resolve_top_k(scope).and_then(|top_k| {
            let fingerprint = self.fingerprint_text(raw_text)?;
            self.scan(&fingerprint.signature, scope, top_k, start)
        });
        report(&outcome, start);
        outcome
    }

    /// Like [`check_document`](Self::check_document) for an already computed
    /// signature.
    pub fn check_signature(
        &self,
        query: &Signature,
        scope: &ScopeParams,
    ) -> Result<CheckResult, MatchError> {
        let start = Instant::now();
        let outcome = self
            .resolve_top_k(scope)
            .and_then(|top_k| self.scan(query, scope, top_k, start));
        report(&outcome, start);
        outcome
    }

    fn scan(
        &self,
        query: &Signature,
        scope: &ScopeParams,
        top_k: usize,
        start: Instant,
    ) -> Result<CheckResult, MatchError> {
        let exclude_owner = scope.exclude_owner.as_deref();
        let institution = scope.institution.as_deref();
        let candidates = self
            .store
            .fetch_candidates(exclude_owner, institution)
            .inspect_err(|e| warn!(error = %e, "corpus retrieval failed"))?;

        let category_scope = scope.category_scope();
        // Filters are re-applied so a lax store cannot leak self-matches.
        let retained: Vec<&CorpusDocument> = candidates
            .iter()
            .filter(|doc| passes_filters(doc, exclude_owner, institution))
            .filter(|doc| scope.exclude_document != Some(doc.id))
            .filter(|doc| category_scope.admits(&doc.category))
            .collect();
        debug!(
            fetched = candidates.len(),
            retained = retained.len(),
            top_k,
            "scanning corpus"
        );

        let score = |doc: &&CorpusDocument| -> Result<ComparisonResult, MatchError> {
            let similarity = compare(query, &doc.signature)?;
            Ok(ComparisonResult {
                document_id: doc.id,
                category: doc.category.clone(),
                similarity: to_percent(similarity),
            })
        };
        let scored: Vec<ComparisonResult> = if self.cfg.parallel {
            retained.par_iter().map(score).collect::<Result<_, _>>()?
        } else {
            retained.iter().map(score).collect::<Result<_, _>>()?
        };

        let similar_documents = rank(scored, top_k);
        let uniqueness_percent = uniqueness(&similar_documents);
        let result = CheckResult {
            similar_documents,
            uniqueness_percent,
            total_documents_checked: retained.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            checked = result.total_documents_checked,
            uniqueness = result.uniqueness_percent,
            elapsed_ms = result.processing_time_ms,
            "check complete"
        );
        Ok(result)
    }
}

fn report(outcome: &Result<CheckResult, MatchError>, start: Instant) {
    let Some(recorder) = metrics_recorder() else {
        return;
    };
    match outcome {
        Ok(result) => recorder.record_check(
            start.elapsed(),
            result.total_documents_checked,
            result.uniqueness_percent,
        ),
        Err(err) => recorder.record_failure(error_kind(err)),
    }
}

fn error_kind(err: &MatchError) -> &'static str {
    match err {
        MatchError::Validation(_) => "validation",
        MatchError::LengthMismatch { .. } => "length_mismatch",
        MatchError::Retrieval(_) => "retrieval",
        MatchError::Canonical(_) => "canonical",
        MatchError::Perceptual(_) => "perceptual",
        MatchError::InvalidConfig(_) => "invalid_config",
    }
}

/// Similarity in `[0, 1]` as a whole percent.
pub(crate) fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Most similar first, ties in input order, at most `top_k`.
pub(crate) fn rank(mut scored: Vec<ComparisonResult>, top_k: usize) -> Vec<ComparisonResult> {
    // `sort_by` is stable.
    scored.sort_by(|a, b| b.similarity.cmp(&a.similarity));
    scored.truncate(top_k);
    scored
}

pub(crate) fn uniqueness(ranked: &[ComparisonResult]) -> u8 {
    ranked.first().map_or(100, |top| 100 - top.similarity.min(100))
}

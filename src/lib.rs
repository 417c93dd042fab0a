//! Workspace umbrella crate for shingleprint.
//!
//! Re-exports the pipeline crates (`canonical`, `perceptual`, `corpus`,
//! `matcher`) and wires them together from a single [`EngineConfig`]:
//!
//! ```
//! use shingleprint::{build_matcher, EngineConfig, NewDocument, ScopeParams};
//!
//! let matcher = build_matcher(&EngineConfig::default()).unwrap();
//! let text = "Signatures of overlapping five word windows estimate how much \
//!             two documents share without keeping their text around.";
//! matcher.ingest_document(NewDocument::new(text).with_owner("u2")).unwrap();
//!
//! let result = matcher
//!     .check_document(text, &ScopeParams::new().excluding_owner("u1"))
//!     .unwrap();
//! assert_eq!(result.uniqueness_percent, 0);
//! ```

pub mod config;

pub use crate::config::{
    CanonicalYamlConfig, ConfigLoadError, EngineConfig, MatchYamlConfig, PerceptualYamlConfig,
    StoreYamlConfig,
};
pub use canonical::{
    CanonicalError, CanonicalizeConfig, CanonicalizedDocument, Token, canonicalize,
    strip_boilerplate,
};
pub use corpus::{
    Category, CorpusDocument, CorpusEntry, CorpusError, CorpusStore, DocumentId, DocumentStatus,
    InMemoryCorpus, JsonFileCorpus, RetentionPolicy,
};
pub use matcher::{
    CategoryScope, CheckMetrics, CheckResult, ComparisonResult, MatchConfig, MatchError, Matcher,
    NewDocument, ScopeParams, UniquenessStats, set_check_metrics,
};
pub use perceptual::{
    MinHasher, PerceptualConfig, PerceptualError, PerceptualFingerprint, ShingleSet, Signature,
    compare, shingle,
};

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

/// Errors raised by the pure text pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("canonicalization failure: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("perceptual fingerprinting failed: {0}")]
    Perceptual(#[from] PerceptualError),
}

/// Errors raised while assembling a matcher from configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error("failed to open corpus store: {0}")]
    Store(#[from] CorpusError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Canonicalize and sign a text without any length validation or store.
///
/// Useful for batch jobs that compute signatures offline; a text shorter than
/// `k` words yields an all-empty signature.
pub fn fingerprint_document(
    text: &str,
    canonical_cfg: &CanonicalizeConfig,
    perceptual_cfg: &PerceptualConfig,
) -> Result<(CanonicalizedDocument, PerceptualFingerprint), PipelineError> {
    let hasher = MinHasher::new(perceptual_cfg.clone())?;
    let doc = canonicalize(text, canonical_cfg)?;
    let fingerprint = hasher.fingerprint(&doc.tokens);
    Ok((doc, fingerprint))
}

/// Open the corpus store described by `cfg`.
pub fn open_store(cfg: &StoreYamlConfig) -> Result<Arc<dyn CorpusStore>, EngineError> {
    let retention = cfg.retention_policy();
    retention.validate()?;
    match cfg.backend.as_str() {
        "in_memory" => Ok(Arc::new(InMemoryCorpus::with_retention(retention))),
        "json_file" => {
            let path = cfg
                .path
                .as_ref()
                .ok_or_else(|| ConfigLoadError::MissingField("store.path".to_string()))?;
            Ok(Arc::new(JsonFileCorpus::open_with_retention(
                path, retention,
            )?))
        }
        other => Err(ConfigLoadError::Validation(format!("unknown store backend: {other}")).into()),
    }
}

/// Build a matcher over the store named in `cfg`.
pub fn build_matcher(cfg: &EngineConfig) -> Result<Matcher, EngineError> {
    cfg.validate()?;
    let store = open_store(&cfg.store)?;
    build_matcher_with_store(cfg, store)
}

/// Build a matcher over a caller-supplied store, ignoring `cfg.store`.
pub fn build_matcher_with_store(
    cfg: &EngineConfig,
    store: Arc<dyn CorpusStore>,
) -> Result<Matcher, EngineError> {
    cfg.validate()?;
    let matcher = Matcher::new(
        store,
        cfg.canonical.to_canonical_config(),
        cfg.perceptual.to_perceptual_config(),
        cfg.matcher.to_match_config(),
    )?;
    info!(
        name = cfg.name.as_deref().unwrap_or("unnamed"),
        backend = %cfg.store.backend,
        documents = matcher.store().len().unwrap_or(0),
        "matcher ready"
    );
    Ok(matcher)
}

/// Load a YAML config from `path` and build its matcher.
pub fn matcher_from_file<P: AsRef<Path>>(path: P) -> Result<Matcher, EngineError> {
    let cfg = EngineConfig::from_file(path)?;
    build_matcher(&cfg)
}

//! # Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the text pipeline (`canonical`, `perceptual`) and
//! the corpus store (`corpus`). It turns a submitted text into a MinHash
//! signature, scans the scoped corpus, and reports the most similar documents
//! together with a uniqueness score.
//!
//! A check runs in this order:
//!
//! 1. Validate the text (non-blank, at least `min_text_chars` characters).
//! 2. Strip boilerplate, canonicalize, shingle and sign.
//! 3. Fetch candidates from the store, excluding the requesting owner and
//!    restricting to an institution when asked.
//! 4. Apply the category scope: coursework and diploma papers cross-check
//!    each other; any other category requires an exact match.
//! 5. Compare every candidate, round to a whole percent, rank (stable,
//!    descending) and keep the top `K`.
//! 6. Uniqueness is `100 - best similarity`, or 100 when nothing was compared.
//!
//! ## Core Types
//!
//! - [`Matcher`]: the engine; wraps an `Arc<dyn CorpusStore>`.
//! - [`ScopeParams`]: owner / document / institution / category filters and
//!   an optional `top_k` override.
//! - [`CheckResult`] and [`ComparisonResult`]: the ranked outcome.
//! - [`MatchError`]: validation, retrieval and configuration failures.
//! - [`UniquenessStats`]: distribution of uniqueness over past checks.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Matcher, NewDocument, ScopeParams};
//!
//! let matcher = Matcher::in_memory_default().unwrap();
//! let paper = "Shingling splits a text into overlapping windows of five words \
//!              and MinHash summarizes the resulting set in a short signature.";
//!
//! matcher
//!     .ingest_document(NewDocument::new(paper).with_owner("u2").with_category("coursework"))
//!     .unwrap();
//!
//! let result = matcher
//!     .check_document(paper, &ScopeParams::new().excluding_owner("u1").in_category("diploma"))
//!     .unwrap();
//! assert_eq!(result.uniqueness_percent, 0);
//! assert_eq!(result.similar_documents[0].similarity, 100);
//! ```
//!
//! ## Observability
//!
//! Install a [`CheckMetrics`] implementation via [`set_check_metrics`] to
//! record per-check latency, scanned document count and uniqueness. Log
//! output goes through `tracing`; no subscriber is installed here.

pub mod engine;
pub mod metrics;
pub mod stats;
pub mod types;

pub use crate::engine::Matcher;
pub use crate::metrics::{set_check_metrics, CheckMetrics};
pub use crate::stats::{UniquenessBucket, UniquenessStats};
pub use crate::types::{
    CategoryScope, CheckResult, ComparisonResult, MatchConfig, MatchError, NewDocument,
    ScopeParams, DEFAULT_MIN_TEXT_CHARS, DEFAULT_TOP_K,
};

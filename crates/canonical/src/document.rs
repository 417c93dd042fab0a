//! Output type of the canonical text pipeline.

use serde::{Deserialize, Serialize};

use crate::boilerplate::BoilerplateReport;
use crate::token::Token;

/// Canonical form of one document body.
///
/// For a fixed [`CanonicalizeConfig`](crate::CanonicalizeConfig) version and
/// input text every field is deterministic, on any machine and locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizedDocument {
    /// Normalized body text, words separated by single spaces.
    pub canonical_text: String,
    /// Word tokens with byte offsets into `canonical_text`.
    pub tokens: Vec<Token>,
    /// Version of the config that produced this document.
    pub canonical_version: u32,
    /// Which boilerplate sections were removed before tokenizing.
    pub boilerplate: BoilerplateReport,
}

impl CanonicalizedDocument {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Borrow the token texts in document order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| t.text.as_str())
    }
}

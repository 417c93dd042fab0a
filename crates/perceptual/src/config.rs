//! Configuration and error types for shingling and MinHash.
//!
//! Everything here is fixed when a [`MinHasher`](crate::MinHasher) is built.
//! `k`, `signature_len` and `seed` must be identical for every signature that
//! is ever compared with another; changing any of them means re-ingesting the
//! whole corpus.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default shingle width in words.
pub const DEFAULT_SHINGLE_K: usize = 5;
/// Default number of hash functions (signature entries).
pub const DEFAULT_SIGNATURE_LEN: usize = 128;
/// Default seed of the hash coefficient table.
pub const DEFAULT_SEED: u64 = 0xF00D_BAAD_F00D_BAAD;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerceptualConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect the signature must bump this
    /// version, so that old signatures are recognizable as incomparable.
    pub version: u32,
    /// Number of words per shingle.
    pub k: usize,
    /// Number of independent hash functions, i.e. signature length `M`.
    pub signature_len: usize,
    /// Seed the coefficient table and token hashes are derived from.
    pub seed: u64,
    /// Compute signature slots on the rayon pool.
    pub use_parallel: bool,
}

impl PerceptualConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shingle width. Larger k is stricter about word order.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the signature length. Estimator error shrinks with `1/sqrt(M)`.
    pub fn with_signature_len(mut self, len: usize) -> Self {
        self.signature_len = len;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.k < 1 {
            return Err(PerceptualError::InvalidConfigK { k: self.k });
        }
        if self.signature_len < 1 {
            return Err(PerceptualError::InvalidConfigSignatureLen {
                len: self.signature_len,
            });
        }
        Ok(())
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            version: 1,
            k: DEFAULT_SHINGLE_K,
            signature_len: DEFAULT_SIGNATURE_LEN,
            seed: DEFAULT_SEED,
            use_parallel: false,
        }
    }
}

/// Errors returned by shingling, signing and comparison.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid config: k must be >= 1 (got {k})")]
    InvalidConfigK { k: usize },

    #[error("invalid config: signature_len must be >= 1 (got {len})")]
    InvalidConfigSignatureLen { len: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("signature length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("cannot compare zero-length signatures")]
    EmptySignature,
}

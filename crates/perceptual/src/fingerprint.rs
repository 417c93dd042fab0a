//! Signature and metadata types.
//!
//! The signature schema is part of the public contract: stores persist it
//! and compare it against signatures computed later. Any incompatible change
//! must bump [`PERCEPTUAL_VERSION`](crate::PERCEPTUAL_VERSION).

use serde::{Deserialize, Serialize};

use crate::config::PerceptualConfig;
use crate::minhash::EMPTY_SLOT;
use crate::{PERCEPTUAL_ALGORITHM, PERCEPTUAL_VERSION};

/// Fixed-length MinHash signature.
///
/// Immutable once produced. Serializes as a plain array of integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Signature {
    entries: Vec<u64>,
}

impl Signature {
    /// Wrap raw entries, e.g. a signature loaded from storage.
    pub fn from_entries(entries: Vec<u64>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the signature was computed from a document with no shingles.
    pub fn is_empty_document(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|&v| v == EMPTY_SLOT)
    }

    pub fn into_entries(self) -> Vec<u64> {
        self.entries
    }
}

impl AsRef<[u64]> for Signature {
    fn as_ref(&self) -> &[u64] {
        &self.entries
    }
}

/// Parameters a signature was computed with.
///
/// Two signatures are only comparable when `k`, `signature_len` and `seed`
/// agree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureMeta {
    pub perceptual_version: u16,
    pub algorithm_name: String,
    /// Shingle length in words.
    pub k: usize,
    pub signature_len: usize,
    pub seed: u64,
    pub config_version: u32,
}

impl SignatureMeta {
    pub fn from_config(cfg: &PerceptualConfig) -> Self {
        Self {
            perceptual_version: PERCEPTUAL_VERSION,
            algorithm_name: PERCEPTUAL_ALGORITHM.to_string(),
            k: cfg.k,
            signature_len: cfg.signature_len,
            seed: cfg.seed,
            config_version: cfg.version,
        }
    }

    /// Whether signatures produced under `self` and `other` may be compared.
    pub fn is_compatible_with(&self, other: &SignatureMeta) -> bool {
        self.perceptual_version == other.perceptual_version
            && self.k == other.k
            && self.signature_len == other.signature_len
            && self.seed == other.seed
    }
}

/// Signature plus what it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerceptualFingerprint {
    pub signature: Signature,
    /// Number of distinct shingles the signature summarizes.
    pub shingle_count: usize,
    pub meta: SignatureMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_serializes_as_plain_array() {
        let sig = Signature::from_entries(vec![1, 2, 3]);
        assert_eq!(serde_json::to_string(&sig).unwrap(), "[1,2,3]");
        let back: Signature = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn empty_document_detection() {
        assert!(Signature::from_entries(vec![EMPTY_SLOT; 4]).is_empty_document());
        assert!(!Signature::from_entries(vec![EMPTY_SLOT, 1]).is_empty_document());
        assert!(!Signature::from_entries(Vec::new()).is_empty_document());
    }

    #[test]
    fn meta_compatibility() {
        let base = SignatureMeta::from_config(&PerceptualConfig::default());
        assert_eq!(base.algorithm_name, PERCEPTUAL_ALGORITHM);
        assert!(base.is_compatible_with(&base.clone()));

        let other_seed = SignatureMeta::from_config(&PerceptualConfig::default().with_seed(1));
        assert!(!base.is_compatible_with(&other_seed));

        // Parallelism is not part of the signature's identity.
        let parallel = SignatureMeta::from_config(&PerceptualConfig::default().with_parallel(true));
        assert!(base.is_compatible_with(&parallel));
    }

    #[test]
    fn fingerprint_serde_roundtrip() {
        let fp = PerceptualFingerprint {
            signature: Signature::from_entries(vec![9, 8, 7]),
            shingle_count: 3,
            meta: SignatureMeta::from_config(&PerceptualConfig::default().with_signature_len(3)),
        };
        let json = serde_json::to_string(&fp).unwrap();
        let back: PerceptualFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}

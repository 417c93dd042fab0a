//! MinHash signatures over shingle sets.
//!
//! Slot `i` of a signature is `min_x h_i(x)` over the document's shingle keys,
//! where `h_i(x) = (a_i * x + b_i) mod p` with the Mersenne prime
//! `p = 2^61 - 1`. The coefficient table is derived from a single 64-bit seed,
//! so two engines built from the same `(seed, signature_len)` produce
//! bit-identical signatures.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{PerceptualConfig, PerceptualError};
use crate::fingerprint::{PerceptualFingerprint, Signature, SignatureMeta};
use crate::shingles::{shingle, ShingleSet};

/// The Mersenne prime `2^61 - 1`.
pub const MERSENNE_61: u64 = (1 << 61) - 1;

/// Value of every slot of an empty document's signature.
///
/// Real slots are always `< MERSENNE_61`, so the sentinel never collides.
pub const EMPTY_SLOT: u64 = u64::MAX;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Reduce `x` modulo `2^61 - 1`.
#[inline]
pub(crate) fn mod_mersenne(x: u128) -> u64 {
    let p = MERSENNE_61 as u128;
    let mut r = (x & p) + (x >> 61);
    r = (r & p) + (r >> 61);
    let r = r as u64;
    if r >= MERSENNE_61 {
        r - MERSENNE_61
    } else {
        r
    }
}

/// One member `(a, b)` of the universal hash family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashCoefficients {
    pub a: u64,
    pub b: u64,
}

impl HashCoefficients {
    #[inline]
    pub fn apply(&self, x: u64) -> u64 {
        let x = x % MERSENNE_61;
        mod_mersenne(self.a as u128 * x as u128 + self.b as u128)
    }
}

/// Reproducible table of `M` hash coefficients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashFamily {
    seed: u64,
    coefficients: Vec<HashCoefficients>,
}

impl HashFamily {
    /// Derive `m` coefficient pairs from `seed` with a splitmix64 sequence.
    ///
    /// `a` is drawn from `[1, p)` and `b` from `[0, p)`.
    pub fn from_seed(seed: u64, m: usize) -> Self {
        let mut state = seed;
        let mut next = move || {
            let v = splitmix64(state);
            state = state.wrapping_add(GOLDEN_GAMMA);
            v
        };
        let coefficients = (0..m)
            .map(|_| {
                let a = 1 + next() % (MERSENNE_61 - 1);
                let b = next() % MERSENNE_61;
                HashCoefficients { a, b }
            })
            .collect();
        Self { seed, coefficients }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficients(&self) -> &[HashCoefficients] {
        &self.coefficients
    }
}

/// Compute one signature slot: the minimum of `h` over all keys.
#[inline]
pub(crate) fn compute_slot(keys: &[u64], h: &HashCoefficients) -> u64 {
    keys.iter().map(|&x| h.apply(x)).min().unwrap_or(EMPTY_SLOT)
}

/// MinHash engine. Holds the validated config and the coefficient table;
/// cheap to share across threads.
#[derive(Debug, Clone)]
pub struct MinHasher {
    cfg: PerceptualConfig,
    family: HashFamily,
}

impl MinHasher {
    pub fn new(cfg: PerceptualConfig) -> Result<Self, PerceptualError> {
        cfg.validate()?;
        let family = HashFamily::from_seed(cfg.seed, cfg.signature_len);
        Ok(Self { cfg, family })
    }

    pub fn config(&self) -> &PerceptualConfig {
        &self.cfg
    }

    pub fn family(&self) -> &HashFamily {
        &self.family
    }

    /// Shingle a canonical token stream with this engine's `k` and seed.
    pub fn shingles<S: AsRef<str>>(&self, tokens: &[S]) -> ShingleSet {
        shingle(tokens, self.cfg.k, self.cfg.seed)
    }

    /// Compute the signature of a shingle set.
    ///
    /// An empty set yields a signature of [`EMPTY_SLOT`] entries.
    pub fn signature(&self, set: &ShingleSet) -> Signature {
        let m = self.family.len();
        if set.is_empty() {
            return Signature::from_entries(vec![EMPTY_SLOT; m]);
        }
        let keys = set.keys();
        let mut entries = Vec::with_capacity(m);
        if self.cfg.use_parallel {
            self.family
                .coefficients
                .par_iter()
                .map(|h| compute_slot(keys, h))
                .collect_into_vec(&mut entries);
        } else {
            entries.extend(self.family.coefficients.iter().map(|h| compute_slot(keys, h)));
        }
        Signature::from_entries(entries)
    }

    /// Shingle and sign a token stream in one step.
    pub fn fingerprint<S: AsRef<str>>(&self, tokens: &[S]) -> PerceptualFingerprint {
        let set = self.shingles(tokens);
        let signature = self.signature(&set);
        PerceptualFingerprint {
            signature,
            shingle_count: set.len(),
            meta: SignatureMeta::from_config(&self.cfg),
        }
    }
}

/// A 64-bit mixer with good avalanche, used for seed derivation.
#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(GOLDEN_GAMMA);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher(m: usize) -> MinHasher {
        MinHasher::new(PerceptualConfig::default().with_signature_len(m)).unwrap()
    }

    // ==================== Modular arithmetic ====================

    #[test]
    fn mod_mersenne_matches_plain_modulo() {
        let samples: [u128; 6] = [
            0,
            MERSENNE_61 as u128 - 1,
            MERSENNE_61 as u128,
            MERSENNE_61 as u128 + 5,
            u64::MAX as u128,
            (MERSENNE_61 as u128 - 1) * (MERSENNE_61 as u128 - 1) + MERSENNE_61 as u128 - 1,
        ];
        for x in samples {
            assert_eq!(mod_mersenne(x) as u128, x % MERSENNE_61 as u128, "x = {x}");
        }
    }

    #[test]
    fn hash_values_stay_below_prime() {
        let family = HashFamily::from_seed(7, 64);
        for h in family.coefficients() {
            for x in [0u64, 1, MERSENNE_61, u64::MAX, 0xDEAD_BEEF] {
                assert!(h.apply(x) < MERSENNE_61);
            }
        }
    }

    // ==================== Hash family ====================

    #[test]
    fn family_coefficients_in_range() {
        let family = HashFamily::from_seed(DEFAULT_TEST_SEED, 256);
        assert_eq!(family.len(), 256);
        for h in family.coefficients() {
            assert!(h.a >= 1 && h.a < MERSENNE_61);
            assert!(h.b < MERSENNE_61);
        }
    }

    #[test]
    fn family_is_reproducible_from_seed() {
        assert_eq!(HashFamily::from_seed(1, 32), HashFamily::from_seed(1, 32));
        assert_ne!(HashFamily::from_seed(1, 32), HashFamily::from_seed(2, 32));
    }

    #[test]
    fn family_prefix_is_stable_across_lengths() {
        let short = HashFamily::from_seed(9, 16);
        let long = HashFamily::from_seed(9, 128);
        assert_eq!(short.coefficients(), &long.coefficients()[..16]);
    }

    #[test]
    fn family_serde_roundtrip() {
        let family = HashFamily::from_seed(3, 8);
        let json = serde_json::to_string(&family).unwrap();
        let back: HashFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(family, back);
        assert_eq!(back.seed(), 3);
    }

    const DEFAULT_TEST_SEED: u64 = 0x5EED;

    // ==================== Signatures ====================

    #[test]
    fn empty_set_yields_sentinel_signature() {
        let sig = hasher(16).signature(&ShingleSet::default());
        assert_eq!(sig.len(), 16);
        assert!(sig.entries().iter().all(|&v| v == EMPTY_SLOT));
        assert!(sig.is_empty_document());
    }

    #[test]
    fn signature_has_configured_length() {
        let set = ShingleSet::from_keys(vec![1, 2, 3]);
        for m in [1, 8, 64, 128] {
            assert_eq!(hasher(m).signature(&set).len(), m);
        }
    }

    #[test]
    fn signature_is_deterministic() {
        let set = ShingleSet::from_keys(vec![10, 20, 30, 40, 50]);
        let a = hasher(128);
        let b = hasher(128);
        assert_eq!(a.signature(&set), b.signature(&set));
    }

    #[test]
    fn signature_ignores_key_order() {
        let h = hasher(64);
        let a = ShingleSet::from_keys(vec![5, 1, 3]);
        let b = ShingleSet::from_keys(vec![3, 5, 1, 1]);
        assert_eq!(h.signature(&a), h.signature(&b));
    }

    #[test]
    fn slot_is_minimum_over_keys() {
        let h = hasher(4);
        let keys = vec![100u64, 7, 99_999, 3];
        let set = ShingleSet::from_keys(keys.clone());
        let sig = h.signature(&set);
        for (slot, coeff) in sig.entries().iter().zip(h.family().coefficients()) {
            let expected = keys.iter().map(|&k| coeff.apply(k)).min().unwrap();
            assert_eq!(*slot, expected);
        }
    }

    #[test]
    fn parallel_equals_sequential() {
        let set = ShingleSet::from_keys((0..500u64).map(splitmix64).collect());
        let seq = MinHasher::new(PerceptualConfig::default()).unwrap();
        let par = MinHasher::new(PerceptualConfig::default().with_parallel(true)).unwrap();
        assert_eq!(seq.signature(&set), par.signature(&set));
    }

    #[test]
    fn different_seeds_give_different_signatures() {
        let set = ShingleSet::from_keys(vec![1, 2, 3, 4, 5]);
        let a = MinHasher::new(PerceptualConfig::default().with_seed(1)).unwrap();
        let b = MinHasher::new(PerceptualConfig::default().with_seed(2)).unwrap();
        assert_ne!(a.signature(&set), b.signature(&set));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = MinHasher::new(PerceptualConfig::default().with_signature_len(0)).unwrap_err();
        assert_eq!(err, PerceptualError::InvalidConfigSignatureLen { len: 0 });
    }

    #[test]
    fn fingerprint_records_meta_and_count() {
        let h = hasher(32);
        let tokens = ["a", "b", "c", "d", "e", "f", "g"];
        let fp = h.fingerprint(&tokens);
        assert_eq!(fp.shingle_count, 3);
        assert_eq!(fp.signature.len(), 32);
        assert_eq!(fp.meta.k, 5);
        assert_eq!(fp.meta.signature_len, 32);
    }

    // ==================== SplitMix64 ====================

    #[test]
    fn splitmix64_well_distributed() {
        let unique: std::collections::HashSet<u64> = (0..100u64).map(splitmix64).collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn splitmix64_avalanche_effect() {
        let diff_bits = (splitmix64(1000) ^ splitmix64(1001)).count_ones();
        assert!(diff_bits > 16, "SplitMix64 should exhibit avalanche effect");
    }
}

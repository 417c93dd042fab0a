//! Word shingling.
//!
//! A shingle is a window of `k` consecutive word tokens. Each window is
//! hashed into a 64-bit key with a seeded polynomial rolling hash over
//! per-token xxh3 hashes, so the whole pass is O(n) in the token count.
//! Duplicate windows collapse: a document is described by the *set* of its
//! shingle keys.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::minhash::splitmix64;

/// Sorted, duplicate-free set of shingle keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ShingleSet {
    keys: Vec<u64>,
}

impl ShingleSet {
    /// Build a set from arbitrary keys; order and duplicates are irrelevant.
    pub fn from_keys(mut keys: Vec<u64>) -> Self {
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }

    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: u64) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Exact Jaccard similarity `|A ∩ B| / |A ∪ B|`; 0 when both are empty.
    pub fn jaccard(&self, other: &ShingleSet) -> f64 {
        let (mut i, mut j, mut shared) = (0, 0, 0usize);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        let union = self.keys.len() + other.keys.len() - shared;
        if union == 0 {
            0.0
        } else {
            shared as f64 / union as f64
        }
    }
}

/// Produce the set of `k`-word shingles of a token stream.
///
/// Tokens must already be canonical (see the `canonical` crate); this
/// function does not normalize. Fewer than `k` tokens, or `k == 0`, yield an
/// empty set.
pub fn shingle<S: AsRef<str>>(tokens: &[S], k: usize, seed: u64) -> ShingleSet {
    ShingleSet::from_keys(rolling_shingle_keys(tokens, k, seed))
}

/// Rolling-hash keys of every `k`-token window, in document order.
pub(crate) fn rolling_shingle_keys<S: AsRef<str>>(tokens: &[S], k: usize, seed: u64) -> Vec<u64> {
    let n = tokens.len();
    if k == 0 || n < k {
        return Vec::new();
    }
    let th: Vec<u64> = tokens
        .iter()
        .map(|t| xxh3_64_with_seed(t.as_ref().as_bytes(), seed))
        .collect();

    // Prime base mixed with the seed.
    const BASE: u64 = 1_000_003;
    let base = BASE ^ splitmix64(seed);

    // base^(k-1), to drop the oldest token from the window.
    let mut base_km1 = 1u64;
    for _ in 1..k {
        base_km1 = base_km1.wrapping_mul(base);
    }

    let mut out = Vec::with_capacity(n - k + 1);
    let mut h = 0u64;
    for &val in th.iter().take(k) {
        h = h.wrapping_mul(base).wrapping_add(val);
    }
    out.push(h);

    for (&old, &new) in th.iter().zip(th.iter().skip(k)) {
        h = h.wrapping_sub(old.wrapping_mul(base_km1));
        h = h.wrapping_mul(base).wrapping_add(new);
        out.push(h);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 42;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn fewer_tokens_than_k_is_empty() {
        let set = shingle(&words("one two three four"), 5, SEED);
        assert!(set.is_empty());
        assert!(shingle::<&str>(&[], 5, SEED).is_empty());
    }

    #[test]
    fn k_zero_is_empty() {
        assert!(shingle(&words("a b c"), 0, SEED).is_empty());
    }

    #[test]
    fn exact_k_tokens_give_one_shingle() {
        assert_eq!(shingle(&words("a b c d e"), 5, SEED).len(), 1);
    }

    #[test]
    fn ten_words_give_six_shingles() {
        let tokens = words("w0 w1 w2 w3 w4 w5 w6 w7 w8 w9");
        assert_eq!(shingle(&tokens, 5, SEED).len(), 6);
        assert_eq!(rolling_shingle_keys(&tokens, 5, SEED).len(), tokens.len() - 5 + 1);
    }

    #[test]
    fn repeated_windows_collapse() {
        // "a b" repeats: windows (a b) (b a) (a b) (b a) (a b)
        let tokens = words("a b a b a b");
        assert_eq!(rolling_shingle_keys(&tokens, 2, SEED).len(), 5);
        assert_eq!(shingle(&tokens, 2, SEED).len(), 2);
    }

    #[test]
    fn rolling_hash_matches_fresh_window_hash() {
        let tokens = words("the quick brown fox jumps over the lazy dog");
        let rolled = rolling_shingle_keys(&tokens, 3, SEED);
        for (i, &key) in rolled.iter().enumerate() {
            let fresh = rolling_shingle_keys(&tokens[i..i + 3], 3, SEED);
            assert_eq!(fresh, vec![key], "window {i}");
        }
    }

    #[test]
    fn order_matters_within_a_window() {
        let a = shingle(&words("the quick brown"), 3, SEED);
        let b = shingle(&words("brown quick the"), 3, SEED);
        assert_ne!(a, b);
    }

    #[test]
    fn deterministic_for_same_input() {
        let tokens = words("one two three four five six seven");
        assert_eq!(shingle(&tokens, 5, SEED), shingle(&tokens, 5, SEED));
    }

    #[test]
    fn seed_changes_keys() {
        let tokens = words("one two three four five six");
        assert_ne!(shingle(&tokens, 5, 1), shingle(&tokens, 5, 2));
    }

    #[test]
    fn accepts_owned_strings() {
        let tokens: Vec<String> = (0..8).map(|i| format!("token{i}")).collect();
        assert_eq!(shingle(&tokens, 5, SEED).len(), 4);
    }

    #[test]
    fn exact_jaccard() {
        let a = ShingleSet::from_keys(vec![1, 2, 3, 4]);
        let b = ShingleSet::from_keys(vec![3, 4, 5, 6, 4]);
        assert_eq!(b.len(), 4);
        assert!((a.jaccard(&b) - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(a.jaccard(&a), 1.0);
        assert_eq!(ShingleSet::default().jaccard(&ShingleSet::default()), 0.0);
        assert!(b.contains(5));
        assert!(!b.contains(1));
    }
}

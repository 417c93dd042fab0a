//! # Perceptual signatures
//!
//! Turns canonical word tokens into a compact, similarity-preserving MinHash
//! signature and compares signatures.
//!
//! ## Contract
//!
//! - This crate **only** consumes canonical tokens produced by the
//!   `canonical` crate. It never normalizes or tokenizes.
//! - Every function is pure: no I/O, no clocks, no global state.
//!
//! Invariant: for the same token sequence and the same [`PerceptualConfig`],
//! the signature is bit-identical on every run and every machine.
//!
//! ## Pipeline
//!
//! 1.  **Shingling**: every window of `k` consecutive tokens is hashed into a
//!     64-bit key with a seeded rolling hash. Duplicate windows collapse into
//!     a [`ShingleSet`].
//!
//! 2.  **MinHashing**: `M` hash functions `h_i(x) = (a_i x + b_i) mod (2^61 - 1)`
//!     from a seeded [`HashFamily`] map the set to a [`Signature`] whose slot
//!     `i` is `min_x h_i(x)`. Optionally parallel over slots via rayon.
//!
//! 3.  **Comparison**: [`compare`] returns the share of equal slots, an
//!     unbiased estimate of the Jaccard similarity of the two shingle sets.
//!
//! ## Example
//!
//! ```
//! use perceptual::{compare, MinHasher, PerceptualConfig};
//!
//! let hasher = MinHasher::new(PerceptualConfig::default()).unwrap();
//! let tokens = ["the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog"];
//!
//! let fp = hasher.fingerprint(&tokens);
//! assert_eq!(fp.signature.len(), 128);
//! assert_eq!(fp.shingle_count, 5);
//! assert_eq!(compare(&fp.signature, &fp.signature).unwrap(), 1.0);
//! ```

mod compare;
pub mod config;
pub mod fingerprint;
mod minhash;
mod shingles;

pub use crate::compare::{compare, compare_entries};
pub use crate::config::{
    PerceptualConfig, PerceptualError, DEFAULT_SEED, DEFAULT_SHINGLE_K, DEFAULT_SIGNATURE_LEN,
};
pub use crate::fingerprint::{PerceptualFingerprint, Signature, SignatureMeta};
pub use crate::minhash::{HashCoefficients, HashFamily, MinHasher, EMPTY_SLOT, MERSENNE_61};
pub use crate::shingles::{shingle, ShingleSet};

/// Current perceptual algorithm version for this crate.
pub const PERCEPTUAL_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const PERCEPTUAL_ALGORITHM: &str = "word-shingle-minhash-mersenne61_v1";

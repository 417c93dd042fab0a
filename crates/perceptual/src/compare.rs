//! Signature comparison.

use crate::config::PerceptualError;
use crate::fingerprint::Signature;
use crate::minhash::EMPTY_SLOT;

/// Estimated Jaccard similarity of two signatures, in `[0, 1]`.
///
/// The estimate is the share of positions where both signatures agree.
/// Positions where either side holds the empty-document sentinel never count
/// as agreement, so a document without shingles is dissimilar to everything,
/// itself included.
///
/// Signatures of different lengths come from different configurations and
/// are rejected rather than truncated.
pub fn compare(a: &Signature, b: &Signature) -> Result<f64, PerceptualError> {
    compare_entries(a.entries(), b.entries())
}

/// [`compare`] over raw signature slices.
pub fn compare_entries(a: &[u64], b: &[u64]) -> Result<f64, PerceptualError> {
    if a.len() != b.len() {
        return Err(PerceptualError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(PerceptualError::EmptySignature);
    }
    let equal = a
        .iter()
        .zip(b)
        .filter(|&(x, y)| x == y && *x != EMPTY_SLOT)
        .count();
    Ok(equal as f64 / a.len() as f64)
}

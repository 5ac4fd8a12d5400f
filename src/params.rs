//! Sizing of the bit array and the hash count.
//!
//! For `n` expected elements and a target false positive rate `p`:
//!
//! * `m = ceil(-n * ln(p) / (ln 2)^2)` bits
//! * `k = round((m / n) * ln 2)` hash functions, at least one
use crate::error::{BloomError, BloomResult};
use std::f64::consts::LN_2;

/// Derived parameters of a filter: bit array length and hash count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParameters {
    pub bit_vector_size: usize,
    pub num_hashes: usize,
}

pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    ((-(n as f64) * fpr.ln()) / (LN_2 * LN_2)).ceil() as usize
}

pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    (((m as f64 / n as f64) * LN_2).round() as usize).max(1)
}

/// Computes `(m, k)` for `n` elements at false positive rate `p`.
///
/// Fails with [`BloomError::InvalidParameter`] when `n` is zero, when `p`
/// is not strictly between 0 and 1, or when the bit array would not be
/// addressable.
pub fn compute_size(n: usize, p: f64) -> BloomResult<HashParameters> {
    if n == 0 {
        return Err(BloomError::InvalidParameter(
            "Expected element count must be > 0".into(),
        ));
    }
    // NaN fails both comparisons, so test for the valid range instead
    if !(p > 0.0 && p < 1.0) {
        return Err(BloomError::InvalidParameter(format!(
            "False positive rate must be between 0 and 1, got {p}"
        )));
    }

    let bits = ((-(n as f64) * p.ln()) / (LN_2 * LN_2)).ceil();
    if !bits.is_finite() || bits >= usize::MAX as f64 {
        return Err(BloomError::InvalidParameter(format!(
            "Bit array for {n} elements at rate {p} is too large"
        )));
    }

    let bit_vector_size = (bits as usize).max(1);
    let num_hashes = optimal_num_hashes(n, bit_vector_size);

    Ok(HashParameters {
        bit_vector_size,
        num_hashes,
    })
}

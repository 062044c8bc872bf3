//! Optimal Bloom filter parameter calculation
//!
//! Formulas (n_eff = max(n, 1)):
//! - m = ceil(-n_eff*ln(p) / (ln(2)^2)), at least 1  -- bits
//! - k = round((m/n_eff) * ln(2)), at least 1        -- hash functions
//!
//! Both are evaluated in f64. `round` is half-away-from-zero. Changing either
//! rounding step changes the persisted `k`/`m` of every artifact.

use std::f64::consts::LN_2;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (m)
    pub bit_count: u64,
    /// Number of hash functions (k)
    pub hash_count: u32,
    /// Expected false positive rate once `capacity` elements are inserted
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// `capacity == 0` is sized as if one element were expected so the result is
/// always a usable filter. `target_fpr` is assumed to be in `(0, 1)`; callers
/// validate it first (see [`IndexConfig::validate`](super::IndexConfig::validate)).
pub fn calculate_optimal_parameters(capacity: usize, target_fpr: f64) -> BloomFilterParams {
    let n = capacity.max(1) as f64;
    let ln2_squared = LN_2 * LN_2;

    // `as` saturates, so NaN maps to 0 and is lifted by max(1)
    let bit_count = ((-(n * target_fpr.ln()) / ln2_squared).ceil() as u64).max(1);
    let hash_count = (((bit_count as f64 / n) * LN_2).round() as u32).max(1);

    BloomFilterParams {
        bit_count,
        hash_count,
        expected_fpr: calculate_fpr(bit_count, capacity, hash_count),
    }
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: u64, n: usize, k: u32) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Estimate how many distinct elements produced `bits_set` set bits
///
/// Formula: n* = -(m/k) * ln(1 - X/m). Saturates to `f64::INFINITY` when
/// every bit is set.
pub fn estimate_cardinality(m: u64, k: u32, bits_set: u64) -> f64 {
    if m == 0 || k == 0 {
        return 0.0;
    }
    let m = m as f64;
    let fill = bits_set as f64 / m;
    -(m / k as f64) * (1.0 - fill).ln()
}

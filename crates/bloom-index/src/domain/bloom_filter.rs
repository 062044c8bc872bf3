//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - `m` and `k` are fixed at construction and never recomputed
//! - Bits are only ever set, never cleared
//! - No false negatives: if inserted, contains() MUST return true

use bitvec::prelude::*;

use super::hash_functions::hash_positions;
use super::parameters::{calculate_fpr, calculate_optimal_parameters, estimate_cardinality};

/// Bloom filter for probabilistic membership testing
///
/// A Bloom filter is a space-efficient probabilistic data structure that
/// can test whether an element is a member of a set. False positives are
/// possible, but false negatives are not.
///
/// There is deliberately no removal, merge or resize operation.
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilter {
    /// Bit array storing the filter state, bit `i` at byte `i / 8`, LSB first
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    hash_count: u32,
    /// Size in bits (m)
    bit_count: u64,
    /// Configured capacity (n)
    capacity: usize,
    /// Configured false positive rate (p)
    false_positive_rate: f64,
    /// Number of insert calls
    inserted: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter sized for `capacity` elements at `false_positive_rate`
    ///
    /// A capacity of zero still produces a valid (tiny) filter. The rate must
    /// be in `(0, 1)`; it is validated with the rest of the configuration.
    pub fn new(capacity: usize, false_positive_rate: f64) -> Self {
        let params = calculate_optimal_parameters(capacity, false_positive_rate);
        Self {
            bits: bitvec![u8, Lsb0; 0; params.bit_count as usize],
            hash_count: params.hash_count,
            bit_count: params.bit_count,
            capacity,
            false_positive_rate,
            inserted: 0,
        }
    }

    /// Rebuild a filter from persisted parts
    ///
    /// `bits` must hold at least `bit_count` bits; anything past that is
    /// padding and is dropped.
    pub(crate) fn from_parts(
        false_positive_rate: f64,
        hash_count: u32,
        bit_count: u64,
        mut bits: BitVec<u8, Lsb0>,
    ) -> Self {
        bits.truncate(bit_count as usize);
        Self {
            bits,
            hash_count,
            bit_count,
            capacity: 0,
            false_positive_rate,
            inserted: 0,
        }
    }

    /// Insert an element into the filter
    ///
    /// After insertion, `contains(element)` is guaranteed to return true.
    /// Inserting the same element again leaves the bits unchanged.
    pub fn insert(&mut self, element: &[u8]) {
        for pos in hash_positions(element, self.hash_count, self.bit_count) {
            self.bits.set(pos, true);
        }
        self.inserted += 1;
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set (never false negative)
    pub fn contains(&self, element: &[u8]) -> bool {
        hash_positions(element, self.hash_count, self.bit_count).all(|pos| self.bits[pos])
    }

    /// Theoretical false positive rate at the current insert count
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn current_false_positive_rate(&self) -> f64 {
        calculate_fpr(self.bit_count, self.inserted, self.hash_count)
    }

    /// Estimate the number of distinct elements from bit density
    ///
    /// Useful on decoded filters, which do not carry an insert count.
    pub fn estimated_len(&self) -> f64 {
        estimate_cardinality(self.bit_count, self.hash_count, self.bits_set() as u64)
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits (m)
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Get the number of hash functions (k)
    pub fn hash_count(&self) -> u32 {
        self.hash_count
    }

    /// Get the configured capacity (n); zero for decoded filters
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the configured false positive rate (p)
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// Get the number of insert calls; zero for decoded filters
    pub fn len(&self) -> usize {
        self.inserted
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// Packed bit storage, `ceil(m / 8)` bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }
}

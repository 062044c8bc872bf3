//! Hash functions for Bloom filter
//!
//! Two independent base hashes feed the double hashing scheme:
//! - h1: MurmurHash3 x64/128 (seed 0), lower 64 bits
//! - h2: SipHash-1-3 with fixed keys
//!
//! Both are deterministic across runs and platforms, so artifacts written by
//! one process can be queried by another.

use std::hash::Hasher;
use std::io::Cursor;

use siphasher::sip::SipHasher13;

/// Seed for the MurmurHash3 base hash
const MURMUR_SEED: u32 = 0;

/// Fixed SipHash keys for the second base hash
const SIP_KEYS: (u64, u64) = (0x736f_6d65_7073_6575, 0x646f_7261_6e64_6f6d);

/// First base hash: MurmurHash3 x64/128, lower 64 bits
pub fn murmur_hash(element: &[u8]) -> u64 {
    let mut cursor = Cursor::new(element);

    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, MURMUR_SEED).unwrap_or(0);
    hash as u64
}

/// Second base hash: SipHash-1-3
pub fn sip_hash(element: &[u8]) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(SIP_KEYS.0, SIP_KEYS.1);
    hasher.write(element);
    hasher.finish()
}

/// Bit positions tested for one element
///
/// Double hashing: position(i) = (h1 + i * h2) mod m, for i in 0..k,
/// with wrapping 64-bit arithmetic.
#[derive(Clone, Debug)]
pub struct HashPositions {
    h1: u64,
    h2: u64,
    m: u64,
    i: u32,
    k: u32,
}

impl Iterator for HashPositions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.i >= self.k {
            return None;
        }
        let hash = self.h1.wrapping_add((self.i as u64).wrapping_mul(self.h2));
        self.i += 1;
        Some((hash % self.m) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.k - self.i) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HashPositions {}

/// Compute the k hash positions for an element in a filter of m bits
///
/// `m` must be non-zero.
pub fn hash_positions(element: &[u8], k: u32, m: u64) -> HashPositions {
    HashPositions {
        h1: murmur_hash(element),
        h2: sip_hash(element),
        m,
        i: 0,
        k,
    }
}

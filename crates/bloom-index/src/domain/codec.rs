//! Binary artifact format for a single Bloom filter
//!
//! Layout (little-endian, fixed-width):
//!
//! ```text
//! offset 0:  f64  false_positive_rate (p)
//! offset 8:  u32  hash_function_count (k)
//! offset 12: u64  bit_count (m)
//! offset 20: ceil(m/8) bytes of packed bits (bit i -> byte i/8, bit i%8, LSB first)
//! ```
//!
//! Capacity and insert count are not persisted.

use bincode::Options;
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::bloom_filter::BloomFilter;
use crate::error::FormatError;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 20;

/// File extension of persisted filters
pub const INDEX_EXTENSION: &str = "bfindex";

/// Fixed header preceding the packed bits
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct ArtifactHeader {
    false_positive_rate: f64,
    hash_count: u32,
    bit_count: u64,
}

fn header_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

/// Serialize a filter into its artifact bytes
///
/// The header is three fixed-width scalars, so serialization cannot fail.
pub fn encode(filter: &BloomFilter) -> Vec<u8> {
    let header = ArtifactHeader {
        false_positive_rate: filter.false_positive_rate(),
        hash_count: filter.hash_count(),
        bit_count: filter.bit_count(),
    };
    let bits = filter.as_bytes();

    let mut out = Vec::with_capacity(HEADER_LEN + bits.len());
    header_options()
        .serialize_into(&mut out, &header)
        .expect("fixed-width header serializes into a Vec");
    debug_assert_eq!(out.len(), HEADER_LEN);
    out.extend_from_slice(bits);
    out
}

/// Deserialize artifact bytes into a filter
///
/// The byte length must equal `HEADER_LEN + ceil(m / 8)` exactly.
pub fn decode(bytes: &[u8]) -> Result<BloomFilter, FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let header: ArtifactHeader = header_options()
        .deserialize(&bytes[..HEADER_LEN])
        .map_err(|e| FormatError::Header(e.to_string()))?;

    let p = header.false_positive_rate;
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(FormatError::InvalidFalsePositiveRate(p));
    }
    if header.hash_count == 0 {
        return Err(FormatError::ZeroHashCount);
    }
    if header.bit_count == 0 {
        return Err(FormatError::ZeroBitCount);
    }

    let expected = usize::try_from(header.bit_count.div_ceil(8))
        .ok()
        .and_then(|len| len.checked_add(HEADER_LEN))
        .ok_or(FormatError::BitCountTooLarge(header.bit_count))?;

    if bytes.len() < expected {
        return Err(FormatError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(FormatError::Oversized {
            expected,
            actual: bytes.len(),
        });
    }

    let bits = BitVec::<u8, Lsb0>::from_slice(&bytes[HEADER_LEN..]);
    Ok(BloomFilter::from_parts(
        p,
        header.hash_count,
        header.bit_count,
        bits,
    ))
}

/// Artifact name for one column of a source: `<source>.<column>.bfindex`
pub fn artifact_name(source_id: &str, column: usize) -> String {
    format!("{}.{}.{}", source_id, column, INDEX_EXTENSION)
}

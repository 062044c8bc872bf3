//! Domain Layer - Pure indexing logic
//!
//! This layer contains:
//! - Core Bloom filter implementation
//! - Hash functions
//! - Parameter calculations
//! - Binary artifact codec
//! - Domain name expansion
//! - Column extraction
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - Pure functions where possible

pub mod bloom_filter;
pub mod codec;
pub mod column_extractor;
pub mod config;
pub mod domain_name;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::BloomFilter;
pub use codec::{artifact_name, decode, encode, HEADER_LEN, INDEX_EXTENSION};
pub use column_extractor::{distinct_non_empty, extract_columns, ColumnValues, Row};
pub use config::{
    ColumnFilter, IndexConfig, IndexConfigBuilder, DEFAULT_DELIMITER,
    DEFAULT_FALSE_POSITIVE_RATE, DEFAULT_SKIP_LINES,
};
pub use domain_name::{expand, is_domain, DomainSuffixes};
pub use parameters::{calculate_fpr, calculate_optimal_parameters, BloomFilterParams};

//! Service Layer
//!
//! Contains the application service that orchestrates domain logic
//! and coordinates with row sources and artifact sinks via ports.

pub mod indexing_service;

pub use indexing_service::{IndexingService, PARALLEL_THRESHOLD};

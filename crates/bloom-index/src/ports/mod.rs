//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for the command line and embedders
//! - Driven Ports (outbound) - Row sources and artifact sinks

pub mod inbound;
pub mod outbound;

pub use inbound::{IndexEntry, IndexReport, IndexingApi};
pub use outbound::{IndexSink, RowSource};

//! # Tuplestore Observe - Structured Logging
//!
//! Installs the global `tracing` subscriber and provides span helpers shared
//! by the query layer.

pub mod logging;

pub use logging::{init_logging, query_span, LogConfig, LogFormat};

//! litgraph Common Library
//!
//! Shared code for the litgraph services including:
//! - Bibliographic knowledge-graph API client (interpret/evaluate)
//! - Graph assembly pipeline (citation and co-authorship graphs)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod academic;
pub mod config;
pub mod errors;
pub mod graph;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use graph::pipeline::{AssembledGraph, GraphMode, GraphPipeline};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sentinel DOI for records where the upstream service returned none
pub const UNKNOWN_DOI: &str = "unknown";

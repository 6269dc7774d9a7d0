//! Graph assembly
//!
//! Turns entity records from the knowledge-graph service into an
//! in-memory visualization graph: completeness filtering, palette
//! bucketing, node/edge construction, and the end-to-end pipeline.

pub mod assemble;
pub mod model;
pub mod palette;
pub mod pipeline;

pub use assemble::{
    build_author_graph, build_publication_graph, disjunction_expr, filter_complete,
    reference_candidates, CompletePaper, PaperAuthor,
};
pub use model::{GraphNode, NodeId, NodeMeta, NodeRole, VisualGraph};
pub use palette::{bucket, PRIMARY_PALETTE, SECONDARY_PALETTE};
pub use pipeline::{AssembledGraph, GraphMode, GraphPipeline};
